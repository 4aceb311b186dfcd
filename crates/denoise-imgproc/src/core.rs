use denoise_image::Image;

/// Convert a floating point sample to `u8`.
///
/// Rounds to the nearest integer with ties away from zero, then saturates to `[0, 255]`.
/// Every float to `u8` conversion of the engine goes through this function.
///
/// # Example
///
/// ```
/// use denoise_imgproc::core::saturate_u8;
///
/// assert_eq!(saturate_u8(28.333), 28);
/// assert_eq!(saturate_u8(2.5), 3);
/// assert_eq!(saturate_u8(-4.0), 0);
/// assert_eq!(saturate_u8(301.7), 255);
/// ```
#[inline]
pub fn saturate_u8(x: f64) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}

/// Compute the mean and variance of an image.
///
/// The mean and the population variance are computed for each channel
/// of the image in one pass. An empty image yields zeros.
///
/// # Arguments
///
/// * `image` - The input image to compute the statistics of.
///
/// # Returns
///
/// A tuple containing the per channel mean and the per channel variance.
///
/// # Example
///
/// ```
/// use denoise_image::{Image, ImageSize};
/// use denoise_imgproc::core::mean_var;
///
/// let image = Image::<u8, 3>::new(
///    ImageSize {
///      width: 2,
///      height: 2,
///    },
///    vec![0, 1, 2, 253, 254, 255, 128, 129, 130, 64, 65, 66],
/// ).unwrap();
///
/// let (mean, var) = mean_var(&image);
///
/// assert_eq!(mean, [111.25, 112.25, 113.25]);
/// assert!((var[0] - 8745.6875).abs() < 1e-9);
/// ```
pub fn mean_var<const C: usize>(image: &Image<u8, C>) -> ([f64; C], [f64; C]) {
    let (sum, sq_sum) = image.as_slice().chunks_exact(C).fold(
        ([0f64; C], [0f64; C]),
        |(mut sum, mut sq_sum), pixel| {
            for (c, &val) in pixel.iter().enumerate() {
                sum[c] += val as f64;
                sq_sum[c] += (val as f64).powi(2);
            }
            (sum, sq_sum)
        },
    );

    let n = image.size().area() as f64;
    if n == 0.0 {
        return ([0f64; C], [0f64; C]);
    }

    let mean = sum.map(|s| s / n);
    let mut var = [0f64; C];
    for c in 0..C {
        var[c] = (sq_sum[c] / n - mean[c].powi(2)).max(0.0);
    }

    (mean, var)
}

/// Percentage of variance removed going from `before` to `after`.
///
/// Returns zero when `before` is zero.
pub fn variance_reduction(before: f64, after: f64) -> f64 {
    if before == 0.0 {
        return 0.0;
    }
    (before - after) / before * 100.0
}
