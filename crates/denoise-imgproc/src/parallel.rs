use rayon::prelude::*;

use denoise_image::Image;

/// Apply a function to each row of a single channel image in parallel.
///
/// The closure receives the row index and the mutable row slice.
pub fn par_iter_rows_indexed<T>(dst: &mut Image<T, 1>, f: impl Fn(usize, &mut [T]) + Send + Sync)
where
    T: Send,
{
    let cols = dst.cols();
    if cols == 0 {
        return;
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(r, row)| f(r, row));
}

/// Apply a fallible function to each row of a single channel image in parallel.
///
/// Stops at the first error and returns it.
pub fn try_par_iter_rows_indexed<T, E>(
    dst: &mut Image<T, 1>,
    f: impl Fn(usize, &mut [T]) -> Result<(), E> + Send + Sync,
) -> Result<(), E>
where
    T: Send,
    E: Send,
{
    let cols = dst.cols();
    if cols == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .try_for_each(|(r, row)| f(r, row))
}
