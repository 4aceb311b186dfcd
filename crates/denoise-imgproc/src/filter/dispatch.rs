use std::time::Instant;

use denoise_image::Image;
use rayon::prelude::*;

use super::Filter;
use crate::error::FilterError;

fn filter_channel(src: &Image<u8, 1>, filter: &Filter) -> Result<Image<u8, 1>, FilterError> {
    let mut dst = Image::from_size_val(src.size(), 0u8)?;
    filter.apply_single(src, &mut dst)?;
    Ok(dst)
}

/// Apply a filter to every channel of an image.
///
/// Single channel images are filtered directly. Multi channel images are split, each
/// channel is filtered in parallel as an independent grayscale image and the results
/// are merged back in the original channel order.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `filter` - The filter and its parameters.
///
/// # Returns
///
/// A new image with the same shape as `src`.
///
/// # Errors
///
/// Returns an error if the filter parameters are invalid.
///
/// # Example
///
/// ```
/// use denoise_image::{Image, ImageSize};
/// use denoise_imgproc::filter::{apply_filter, Filter, WindowParams};
///
/// let size = ImageSize { width: 4, height: 3 };
/// let src = Image::<u8, 3>::from_size_val(size, 42).unwrap();
///
/// let dst = apply_filter(&src, &Filter::Median(WindowParams::default())).unwrap();
/// assert_eq!(dst, src);
/// ```
pub fn apply_filter<const C: usize>(
    src: &Image<u8, C>,
    filter: &Filter,
) -> Result<Image<u8, C>, FilterError> {
    filter.validate()?;
    let start = Instant::now();

    let dst = if C == 1 {
        let single = Image::<u8, 1>::new(src.size(), src.as_slice().to_vec())?;
        let out = filter_channel(&single, filter)?;
        Image::new(src.size(), out.into_vec())?
    } else {
        let channels = src
            .split_channels()?
            .par_iter()
            .map(|channel| filter_channel(channel, filter))
            .collect::<Result<Vec<_>, _>>()?;
        Image::from_channels(&channels)?
    };

    log::debug!(
        "{filter} on {} image with {} channel(s) took {:?}",
        src.size(),
        C,
        start.elapsed()
    );

    Ok(dst)
}

/// Apply a sequence of filters, each one consuming the output of the previous one.
///
/// An empty chain returns a copy of `src`.
pub fn apply_filter_chain<const C: usize>(
    src: &Image<u8, C>,
    filters: &[Filter],
) -> Result<Image<u8, C>, FilterError> {
    apply_filter_chain_with_progress(src, filters, |_, _, _| {})
}

/// Apply a sequence of filters and report every completed stage.
///
/// `progress` is called once per filter, after it completed, with the zero based stage
/// index, the number of stages and the filter that just ran.
///
/// # Errors
///
/// Returns the error of the first failing stage. Later stages do not run.
pub fn apply_filter_chain_with_progress<const C: usize, F>(
    src: &Image<u8, C>,
    filters: &[Filter],
    mut progress: F,
) -> Result<Image<u8, C>, FilterError>
where
    F: FnMut(usize, usize, &Filter),
{
    let mut current = src.clone();
    for (stage, filter) in filters.iter().enumerate() {
        current = apply_filter(&current, filter)?;
        progress(stage, filters.len(), filter);
    }
    Ok(current)
}
