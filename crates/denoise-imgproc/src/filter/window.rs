use denoise_image::{Image, ImageSize};

use crate::error::FilterError;
use crate::padding::{replicate_padding, Padding2D};

/// Single channel working copy extended by edge replication on all four sides.
pub(crate) struct PaddedGrid<T> {
    data: Vec<T>,
    stride: usize,
    pad: usize,
}

impl<T: Copy + Send + Sync> PaddedGrid<T> {
    /// Pad `src` by `pad` samples and check the resulting shape.
    pub fn new(src: &Image<T, 1>, pad: usize) -> Result<Self, FilterError> {
        let padding = Padding2D::uniform(pad);
        let padded = replicate_padding(src, &padding)?;
        check_padded_shape(&padding, src.size(), padded.size())?;

        Ok(Self {
            stride: padded.width(),
            data: padded.into_vec(),
            pad,
        })
    }

    /// The source sample at `(row, col)`.
    #[inline]
    pub fn center(&self, row: usize, col: usize) -> T {
        self.data[(row + self.pad) * self.stride + col + self.pad]
    }

    /// The `size` x `size` window centred on the source pixel `(row, col)`.
    ///
    /// For even sizes the window extends one sample further up and left.
    /// `size / 2` must not exceed the grid padding.
    #[inline]
    pub fn window(&self, row: usize, col: usize, size: usize) -> Window<'_, T> {
        let half = size / 2;
        debug_assert!(half <= self.pad);
        Window {
            data: &self.data,
            stride: self.stride,
            top: row + self.pad - half,
            left: col + self.pad - half,
            size,
        }
    }
}

fn check_padded_shape(
    padding: &Padding2D,
    size: ImageSize,
    padded: ImageSize,
) -> Result<(), FilterError> {
    if !padding.validate_size(size, padded) {
        let expected = padding.padded_size(size);
        return Err(FilterError::ShapeMismatch(
            padded.width,
            padded.height,
            expected.width,
            expected.height,
        ));
    }
    Ok(())
}

/// A square neighbourhood inside a [`PaddedGrid`].
pub(crate) struct Window<'a, T> {
    data: &'a [T],
    stride: usize,
    top: usize,
    left: usize,
    size: usize,
}

impl<'a, T: Copy> Window<'a, T> {
    /// The rows of the window, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> {
        let (data, stride, left, size) = (self.data, self.stride, self.left, self.size);
        (self.top..self.top + size).map(move |r| {
            let start = r * stride + left;
            &data[start..start + size]
        })
    }

    /// All samples of the window in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        self.rows().flat_map(|row| row.iter().copied())
    }
}
