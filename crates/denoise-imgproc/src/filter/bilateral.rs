use denoise_image::Image;

use super::kernels;
use super::ops::check_same_size;
use super::window::PaddedGrid;
use crate::core::saturate_u8;
use crate::error::FilterError;
use crate::parallel::try_par_iter_rows_indexed;

/// Smooth an image while preserving edges with a bilateral filter.
///
/// Every neighbour is weighted by the product of a spatial weight, depending only on its
/// offset from the centre, and a radiometric weight, depending on its intensity difference
/// with the centre sample:
///
/// `w = exp(-(dx^2 + dy^2) / (2 sigma_spatial^2)) * exp(-(v - v_c)^2 / (2 sigma_intensity^2))`
///
/// The output is `sum(v * w) / sum(w)` computed in `f64`, rounded and saturated to `u8`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_size` - The side length of the window.
/// * `sigma_spatial` - The standard deviation of the spatial gaussian.
/// * `sigma_intensity` - The standard deviation of the radiometric gaussian.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Errors
///
/// Returns an error if a sigma is not a positive finite number, if the window size is zero,
/// or if the weights of a window sum to zero.
///
/// # Example
///
/// ```
/// use denoise_image::{Image, ImageSize};
/// use denoise_imgproc::filter::bilateral_filter;
///
/// let size = ImageSize { width: 4, height: 1 };
/// let src = Image::<u8, 1>::new(size, vec![10, 10, 200, 200]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(size, 0).unwrap();
///
/// // a small intensity sigma keeps the step edge intact
/// bilateral_filter(&src, &mut dst, 3, 2.0, 10.0).unwrap();
/// assert_eq!(dst.as_slice(), &[10, 10, 200, 200]);
/// ```
pub fn bilateral_filter(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
    sigma_spatial: f64,
    sigma_intensity: f64,
) -> Result<(), FilterError> {
    let spatial = kernels::spatial_kernel_2d(kernel_size, sigma_spatial)?;
    let range = kernels::range_kernel_lut(sigma_intensity)?;
    check_same_size(src, dst)?;
    if src.size().area() == 0 {
        return Ok(());
    }

    let grid = PaddedGrid::new(src, kernel_size / 2)?;

    try_par_iter_rows_indexed(dst, |r, row| {
        for (c, out) in row.iter_mut().enumerate() {
            let center = grid.center(r, c);

            let (num, den) = grid
                .window(r, c, kernel_size)
                .iter()
                .zip(spatial.iter())
                .fold((0f64, 0f64), |(num, den), (v, &s)| {
                    let w = s * range[v.abs_diff(center) as usize];
                    (num + v as f64 * w, den + w)
                });

            if !(den.is_finite() && den > 0.0) {
                return Err(FilterError::InvalidParameter(
                    "sigma_intensity",
                    format!("bilateral weights vanish at pixel ({r}, {c})"),
                ));
            }

            *out = saturate_u8(num / den);
        }
        Ok(())
    })
}
