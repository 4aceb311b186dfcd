use denoise_image::{Image, ImageError};

use super::kernels::{self, check_kernel_size};
use super::window::PaddedGrid;
use crate::core::saturate_u8;
use crate::error::FilterError;
use crate::parallel::par_iter_rows_indexed;

pub(crate) fn check_same_size<T, U>(
    src: &Image<T, 1>,
    dst: &Image<U, 1>,
) -> Result<(), FilterError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        )
        .into());
    }
    Ok(())
}

/// Median of a window of samples.
///
/// Reorders `samples`. For an even number of samples the two middle values are
/// averaged and rounded up. `samples` must not be empty.
pub(crate) fn median_of(samples: &mut [u8]) -> u8 {
    let len = samples.len();
    let mid = len / 2;
    let (lower, upper, _) = samples.select_nth_unstable(mid);
    let upper = *upper;
    if len % 2 == 1 {
        return upper;
    }
    let lower = lower.iter().copied().max().unwrap_or(upper);
    ((lower as u16 + upper as u16 + 1) / 2) as u8
}

/// Blur an image with the average of each window.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_size` - The side length of the window.
///
/// The average is rounded to the nearest integer, ties away from zero.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Example
///
/// ```
/// use denoise_image::{Image, ImageSize};
/// use denoise_imgproc::filter::mean_filter;
///
/// let size = ImageSize { width: 3, height: 3 };
/// let src = Image::<u8, 1>::new(size, vec![0, 0, 0, 0, 90, 0, 0, 0, 0]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(size, 0).unwrap();
///
/// mean_filter(&src, &mut dst, 3).unwrap();
/// assert_eq!(dst.as_slice(), &[10; 9]);
/// ```
pub fn mean_filter(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
) -> Result<(), FilterError> {
    check_kernel_size("kernel_size", kernel_size)?;
    check_same_size(src, dst)?;
    if src.size().area() == 0 {
        return Ok(());
    }

    let grid = PaddedGrid::new(src, kernel_size / 2)?;
    let n = (kernel_size * kernel_size) as u64;

    par_iter_rows_indexed(dst, |r, row| {
        for (c, out) in row.iter_mut().enumerate() {
            let sum: u64 = grid.window(r, c, kernel_size).iter().map(u64::from).sum();
            *out = ((sum + n / 2) / n) as u8;
        }
    });

    Ok(())
}

/// Blur an image using a gaussian filter.
///
/// Each output sample is the sum of the window weighted by a normalized 2D gaussian
/// kernel built from `kernel_size` and `sigma`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_size` - The side length of the kernel.
/// * `sigma` - The standard deviation of the gaussian.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_filter(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
    sigma: f64,
) -> Result<(), FilterError> {
    let kernel = kernels::gaussian_kernel_2d(kernel_size, sigma)?;
    check_same_size(src, dst)?;
    if src.size().area() == 0 {
        return Ok(());
    }

    let grid = PaddedGrid::new(src, kernel_size / 2)?;

    par_iter_rows_indexed(dst, |r, row| {
        for (c, out) in row.iter_mut().enumerate() {
            let acc = grid
                .window(r, c, kernel_size)
                .iter()
                .zip(kernel.iter())
                .map(|(v, &k)| v as f64 * k)
                .sum::<f64>();
            *out = saturate_u8(acc);
        }
    });

    Ok(())
}

/// Replace each pixel with the median of its window.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_size` - The side length of the window. Odd sizes are expected; for even
///   sizes the two middle samples are averaged.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn median_filter(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
) -> Result<(), FilterError> {
    check_kernel_size("kernel_size", kernel_size)?;
    check_same_size(src, dst)?;
    if src.size().area() == 0 {
        return Ok(());
    }

    let grid = PaddedGrid::new(src, kernel_size / 2)?;

    par_iter_rows_indexed(dst, |r, row| {
        let mut samples = Vec::with_capacity(kernel_size * kernel_size);
        for (c, out) in row.iter_mut().enumerate() {
            samples.clear();
            samples.extend(grid.window(r, c, kernel_size).iter());
            *out = median_of(&mut samples);
        }
    });

    Ok(())
}

/// Replace each pixel with the minimum of its window.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn min_filter(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
) -> Result<(), FilterError> {
    reduce_filter(src, dst, kernel_size, u8::min)
}

/// Replace each pixel with the maximum of its window.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn max_filter(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
) -> Result<(), FilterError> {
    reduce_filter(src, dst, kernel_size, u8::max)
}

fn reduce_filter(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
    reduce: fn(u8, u8) -> u8,
) -> Result<(), FilterError> {
    check_kernel_size("kernel_size", kernel_size)?;
    check_same_size(src, dst)?;
    if src.size().area() == 0 {
        return Ok(());
    }

    let grid = PaddedGrid::new(src, kernel_size / 2)?;

    par_iter_rows_indexed(dst, |r, row| {
        for (c, out) in row.iter_mut().enumerate() {
            *out = grid
                .window(r, c, kernel_size)
                .iter()
                .reduce(reduce)
                .unwrap_or_else(|| grid.center(r, c));
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use denoise_image::ImageSize;

    fn impulse_5x5(value: u8) -> Result<Image<u8, 1>, ImageError> {
        let mut data = vec![0u8; 25];
        data[12] = value;
        Image::new(
            ImageSize {
                width: 5,
                height: 5,
            },
            data,
        )
    }

    #[test]
    fn test_median_of() {
        assert_eq!(median_of(&mut [5, 1, 3]), 3);
        assert_eq!(median_of(&mut [9, 0, 0, 0, 255, 0, 0, 0, 0]), 0);
        assert_eq!(median_of(&mut [4, 1, 2, 3]), 3);
        assert_eq!(median_of(&mut [10, 20]), 15);
        assert_eq!(median_of(&mut [7]), 7);
    }

    #[test]
    fn test_mean_filter_impulse() -> Result<(), FilterError> {
        let src = impulse_5x5(255)?;
        let mut dst = Image::from_size_val(src.size(), 0)?;

        mean_filter(&src, &mut dst, 3)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0,  0,  0,  0, 0,
                0, 28, 28, 28, 0,
                0, 28, 28, 28, 0,
                0, 28, 28, 28, 0,
                0,  0,  0,  0, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_mean_filter_rounding() -> Result<(), FilterError> {
        // 5 / 9 rounds up, 4 / 9 rounds down
        let src = impulse_5x5(5)?;
        let mut dst = Image::from_size_val(src.size(), 0)?;
        mean_filter(&src, &mut dst, 3)?;
        assert_eq!(dst.as_slice()[12], 1);

        let src = impulse_5x5(4)?;
        mean_filter(&src, &mut dst, 3)?;
        assert_eq!(dst.as_slice()[12], 0);
        Ok(())
    }

    #[test]
    fn test_gaussian_filter_impulse() -> Result<(), FilterError> {
        let src = impulse_5x5(255)?;
        let mut dst = Image::from_size_val(src.size(), 0)?;

        gaussian_filter(&src, &mut dst, 3, 1.0)?;

        let kernel = kernels::gaussian_kernel_2d(3, 1.0)?;
        let d = dst.as_slice();
        assert_eq!(d[12], saturate_u8(255.0 * kernel[4]));
        assert_eq!(d[7], saturate_u8(255.0 * kernel[1]));
        assert_eq!(d[6], saturate_u8(255.0 * kernel[0]));
        assert_eq!(d[0], 0);
        assert!(d[12] > d[7] && d[7] > d[6]);
        Ok(())
    }

    #[test]
    fn test_median_filter_removes_impulse() -> Result<(), FilterError> {
        let src = impulse_5x5(255)?;
        let mut dst = Image::from_size_val(src.size(), 255)?;
        median_filter(&src, &mut dst, 3)?;
        assert_eq!(dst.as_slice(), &[0; 25]);
        Ok(())
    }

    #[test]
    fn test_min_max_filter() -> Result<(), FilterError> {
        let src = impulse_5x5(200)?;
        let mut dst = Image::from_size_val(src.size(), 0)?;

        max_filter(&src, &mut dst, 3)?;
        let expected_max: Vec<u8> = (0..25)
            .map(|i| {
                let (r, c) = (i / 5, i % 5);
                if (1..=3).contains(&r) && (1..=3).contains(&c) {
                    200
                } else {
                    0
                }
            })
            .collect();
        assert_eq!(dst.as_slice(), expected_max.as_slice());

        min_filter(&src, &mut dst, 3)?;
        assert_eq!(dst.as_slice(), &[0; 25]);

        // 1x1 window
        max_filter(&src, &mut dst, 1)?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_edge_replication() -> Result<(), FilterError> {
        let src = Image::<u8, 1>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![0, 90, 180],
        )?;
        let mut dst = Image::from_size_val(src.size(), 0)?;

        // windows: [0,0,90], [0,90,180], [90,180,180] on three identical rows
        mean_filter(&src, &mut dst, 3)?;
        assert_eq!(dst.as_slice(), &[30, 90, 150]);

        max_filter(&src, &mut dst, 3)?;
        assert_eq!(dst.as_slice(), &[90, 180, 180]);
        Ok(())
    }

    #[test]
    fn test_even_kernel_size() -> Result<(), FilterError> {
        let src = Image::<u8, 1>::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            vec![0, 40, 80, 120],
        )?;
        let mut dst = Image::from_size_val(src.size(), 0)?;

        // window at column c spans columns c - 1 ..= c
        mean_filter(&src, &mut dst, 2)?;
        assert_eq!(dst.as_slice(), &[0, 20, 60, 100]);

        median_filter(&src, &mut dst, 2)?;
        assert_eq!(dst.as_slice(), &[0, 20, 60, 100]);
        Ok(())
    }

    #[test]
    fn test_invalid_inputs() -> Result<(), FilterError> {
        let src = impulse_5x5(1)?;
        let mut dst = Image::from_size_val(src.size(), 0)?;
        assert!(matches!(
            mean_filter(&src, &mut dst, 0),
            Err(FilterError::InvalidParameter("kernel_size", _))
        ));
        assert!(matches!(
            gaussian_filter(&src, &mut dst, 3, 0.0),
            Err(FilterError::InvalidParameter("sigma", _))
        ));

        let mut small = Image::from_size_val([2, 2].into(), 0)?;
        assert!(matches!(
            median_filter(&src, &mut small, 3),
            Err(FilterError::Image(ImageError::InvalidImageSize(2, 2, 5, 5)))
        ));
        Ok(())
    }

    #[test]
    fn test_gaussian_filter_tiny_sigma() -> Result<(), FilterError> {
        let src = Image::<u8, 1>::from_size_val([3, 3].into(), 200)?;
        let mut dst = Image::from_size_val(src.size(), 7)?;
        assert!(matches!(
            gaussian_filter(&src, &mut dst, 3, 1e-170),
            Err(FilterError::InvalidParameter("sigma", _))
        ));
        assert!(dst.as_slice().iter().all(|&v| v == 7));

        // a small but representable sigma keeps a constant image fixed
        gaussian_filter(&src, &mut dst, 3, 1e-10)?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_empty_image() -> Result<(), FilterError> {
        let src = Image::<u8, 1>::new([0, 0].into(), vec![])?;
        let mut dst = src.clone();
        mean_filter(&src, &mut dst, 3)?;
        gaussian_filter(&src, &mut dst, 3, 1.0)?;
        median_filter(&src, &mut dst, 3)?;
        min_filter(&src, &mut dst, 3)?;
        assert!(dst.as_slice().is_empty());
        Ok(())
    }
}
