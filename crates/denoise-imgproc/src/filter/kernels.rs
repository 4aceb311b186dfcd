use crate::error::FilterError;

/// Create a normalized 2D gaussian kernel.
///
/// The weight at `(i, j)` is `exp(-((i - c)^2 + (j - c)^2) / (2 sigma^2))` with
/// `c = (kernel_size - 1) / 2` (integer division), normalized so the weights sum to one.
///
/// # Arguments
///
/// * `kernel_size` - The side length of the kernel.
/// * `sigma` - The standard deviation of the gaussian.
///
/// # Returns
///
/// The kernel as a row-major vector of `kernel_size * kernel_size` weights.
///
/// # Errors
///
/// Returns an error if `kernel_size` is zero or `sigma` is not a positive finite number whose
/// square stays in the normal floating point range.
pub fn gaussian_kernel_2d(kernel_size: usize, sigma: f64) -> Result<Vec<f64>, FilterError> {
    check_kernel_size("kernel_size", kernel_size)?;
    check_sigma("sigma", sigma)?;

    let center = ((kernel_size - 1) / 2) as f64;
    let mut kernel = gaussian_grid(kernel_size, center, sigma);

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    if !(norm.is_finite() && norm > 0.0) {
        return Err(FilterError::InvalidParameter(
            "sigma",
            format!("gaussian weights do not normalize for sigma {sigma}"),
        ));
    }
    kernel.iter_mut().for_each(|k| *k /= norm);

    Ok(kernel)
}

/// Create the spatial weights of a bilateral filter.
///
/// The weight at `(i, j)` is `exp(-((i - pad)^2 + (j - pad)^2) / (2 sigma^2))` with
/// `pad = kernel_size / 2`. The weights are not normalized: the centre weight is one.
///
/// # Errors
///
/// Returns an error if `kernel_size` is zero or `sigma` is not a positive finite number.
pub fn spatial_kernel_2d(kernel_size: usize, sigma: f64) -> Result<Vec<f64>, FilterError> {
    check_kernel_size("kernel_size", kernel_size)?;
    check_sigma("sigma_spatial", sigma)?;
    Ok(gaussian_grid(kernel_size, (kernel_size / 2) as f64, sigma))
}

fn gaussian_grid(kernel_size: usize, center: f64, sigma: f64) -> Vec<f64> {
    let denom = 2.0 * sigma * sigma;
    let mut kernel = Vec::with_capacity(kernel_size * kernel_size);
    for i in 0..kernel_size {
        let dy = i as f64 - center;
        for j in 0..kernel_size {
            let dx = j as f64 - center;
            kernel.push((-(dx * dx + dy * dy) / denom).exp());
        }
    }
    kernel
}

/// Lookup table of radiometric weights indexed by absolute intensity difference.
///
/// Entry `d` holds `exp(-d^2 / (2 sigma^2))` for `d` in `0..=255`.
///
/// # Errors
///
/// Returns an error if `sigma` is not a positive finite number.
pub fn range_kernel_lut(sigma: f64) -> Result<[f64; 256], FilterError> {
    check_sigma("sigma_intensity", sigma)?;
    let denom = 2.0 * sigma * sigma;
    let mut lut = [0f64; 256];
    for (d, w) in lut.iter_mut().enumerate() {
        let d = d as f64;
        *w = (-(d * d) / denom).exp();
    }
    Ok(lut)
}

pub(crate) fn check_kernel_size(name: &'static str, kernel_size: usize) -> Result<(), FilterError> {
    if kernel_size == 0 {
        return Err(FilterError::InvalidParameter(
            name,
            "window size must be positive".to_string(),
        ));
    }
    if kernel_size % 2 == 0 {
        log::warn!("{name} {kernel_size} is even, the window will not be centred");
    }
    Ok(())
}

pub(crate) fn check_sigma(name: &'static str, sigma: f64) -> Result<(), FilterError> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(FilterError::InvalidParameter(
            name,
            format!("must be a positive finite number, got {sigma}"),
        ));
    }
    // the exponent denominator must neither underflow nor overflow
    if !(2.0 * sigma * sigma).is_normal() {
        return Err(FilterError::InvalidParameter(
            name,
            format!("{sigma} is out of the representable range"),
        ));
    }
    Ok(())
}
