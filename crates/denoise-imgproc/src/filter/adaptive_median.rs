use denoise_image::Image;

use super::ops::{check_same_size, median_of};
use super::window::PaddedGrid;
use crate::error::FilterError;
use crate::parallel::par_iter_rows_indexed;

/// Smallest window the adaptive median starts from.
pub const ADAPTIVE_MEDIAN_MIN_WINDOW: usize = 3;

/// Resolution of a single pixel of the adaptive median filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AdaptiveMedianOutcome {
    /// The output sample.
    pub value: u8,
    /// The window size at which the pixel was resolved.
    pub window_size: usize,
}

/// Resolve one pixel by growing its window until the median is informative.
///
/// Stage A: the window median must lie strictly between the window min and max,
/// otherwise the window grows by two. Stage B: the centre sample is kept when it lies
/// strictly between min and max, otherwise it is replaced by the median. When the
/// window reaches `max_kernel_size` without an informative median, the last median
/// is emitted.
pub(crate) fn adaptive_median_pixel(
    grid: &PaddedGrid<u8>,
    row: usize,
    col: usize,
    max_kernel_size: usize,
    samples: &mut Vec<u8>,
) -> AdaptiveMedianOutcome {
    let z = grid.center(row, col);
    let mut window_size = ADAPTIVE_MEDIAN_MIN_WINDOW;

    loop {
        samples.clear();
        samples.extend(grid.window(row, col, window_size).iter());

        let (z_min, z_max) = samples
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let z_med = median_of(samples);

        // stage A
        if z_min < z_med && z_med < z_max {
            // stage B
            let value = if z_min < z && z < z_max { z } else { z_med };
            return AdaptiveMedianOutcome { value, window_size };
        }

        if window_size + 2 > max_kernel_size {
            return AdaptiveMedianOutcome {
                value: z_med,
                window_size,
            };
        }

        window_size += 2;
    }
}

/// Remove impulse noise with an adaptive median filter.
///
/// Each pixel starts with a 3x3 window that grows by two until its median is neither the
/// window minimum nor maximum, or until `max_kernel_size` is reached. Min, max and median
/// are recomputed over the full window at every size. Noisy pixels (equal to the window
/// minimum or maximum) are replaced by the median, the others are kept.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `max_kernel_size` - The largest window side length, at least 3.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Errors
///
/// Returns an error if `max_kernel_size` is smaller than 3 or if the images differ in size.
pub fn adaptive_median_filter(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    max_kernel_size: usize,
) -> Result<(), FilterError> {
    if max_kernel_size < ADAPTIVE_MEDIAN_MIN_WINDOW {
        return Err(FilterError::InvalidParameter(
            "max_kernel_size",
            format!("must be at least {ADAPTIVE_MEDIAN_MIN_WINDOW}, got {max_kernel_size}"),
        ));
    }
    if max_kernel_size % 2 == 0 {
        log::warn!(
            "max_kernel_size {max_kernel_size} is even, windows stop at {}",
            max_kernel_size - 1
        );
    }
    check_same_size(src, dst)?;
    if src.size().area() == 0 {
        return Ok(());
    }

    let grid = PaddedGrid::new(src, max_kernel_size / 2)?;

    par_iter_rows_indexed(dst, |r, row| {
        let mut samples = Vec::with_capacity(max_kernel_size * max_kernel_size);
        for (c, out) in row.iter_mut().enumerate() {
            *out = adaptive_median_pixel(&grid, r, c, max_kernel_size, &mut samples).value;
        }
    });

    Ok(())
}
