use denoise_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// Create a padding with the same extent on all four sides.
    pub fn uniform(pad: usize) -> Self {
        Self {
            top: pad,
            bottom: pad,
            left: pad,
            right: pad,
        }
    }

    /// Size of an image of `size` once this padding is applied.
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }

    /// Validates that a new image size correctly matches the expected dimensions
    /// after applying this padding to an existing image.
    ///
    /// # Example
    /// ```rust
    /// use denoise_image::ImageSize;
    /// use denoise_imgproc::padding::Padding2D;
    /// let padding = Padding2D { top: 1, bottom: 1, left: 2, right: 2 };
    /// let old_size = ImageSize { width: 4, height: 4 };
    /// let new_size = ImageSize { width: 8, height: 6 };
    ///
    /// assert!(padding.validate_size(old_size, new_size));
    /// ```
    pub fn validate_size(&self, old_size: ImageSize, new_size: ImageSize) -> bool {
        self.padded_size(old_size) == new_size
    }
}

/// Maps a possibly out-of-range index into `[0, len)` by clamping to the edge.
///
/// `len` must be greater than zero.
#[inline]
pub fn replicate_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Creates a new image extended on every side by repeating the nearest edge sample.
///
/// Each output sample at `(r, c)` equals the input sample at
/// `(clamp(r - top), clamp(c - left))`, clamped independently on each axis.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `padding` - The amount of padding (in pixels) for all four sides.
///
/// # Errors
///
/// Returns an error if the source image is empty and a non-zero padding is requested.
///
/// # Example
///
/// ```rust
/// use denoise_image::{Image, ImageSize};
/// use denoise_imgproc::padding::{replicate_padding, Padding2D};
///
/// let src = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![1, 2]).unwrap();
/// let dst = replicate_padding(&src, &Padding2D::uniform(1)).unwrap();
///
/// assert_eq!(dst.size(), ImageSize { width: 4, height: 3 });
/// assert_eq!(dst.as_slice(), &[1, 1, 2, 2, 1, 1, 2, 2, 1, 1, 2, 2]);
/// ```
pub fn replicate_padding<T, const C: usize>(
    src: &Image<T, C>,
    padding: &Padding2D,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Send + Sync,
{
    let new_size = padding.padded_size(src.size());

    let Some(&fill) = src.as_slice().first() else {
        if new_size.area() == 0 {
            return Ok(src.clone());
        }
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            new_size.width,
            new_size.height,
        ));
    };

    let mut dst = Image::<T, C>::from_size_val(new_size, fill)?;

    let old_width = src.width();
    let old_height = src.height();
    let src_stride = old_width * C;
    let dst_stride = new_size.width * C;
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_y = replicate_index(y as isize - padding.top as isize, old_height);
            let src_row = &src_data[src_y * src_stride..(src_y + 1) * src_stride];

            // interior
            dst_row[padding.left * C..padding.left * C + src_stride].copy_from_slice(src_row);

            // left
            for x in 0..padding.left {
                dst_row[x * C..(x + 1) * C].copy_from_slice(&src_row[..C]);
            }

            // right
            let last = &src_row[src_stride - C..];
            for x in (padding.left + old_width)..new_size.width {
                dst_row[x * C..(x + 1) * C].copy_from_slice(last);
            }
        });

    Ok(dst)
}
