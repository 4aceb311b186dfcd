use denoise_image::ImageError;

/// An error type for the filtering engine.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// A filter or noise parameter is out of its valid range.
    #[error("Invalid parameter `{0}`: {1}")]
    InvalidParameter(&'static str, String),

    /// The padded grid does not have the expected shape.
    #[error("Padded grid is {0}x{1} but {2}x{3} was expected")]
    ShapeMismatch(usize, usize, usize, usize),

    /// Error raised by the underlying image buffers.
    #[error(transparent)]
    Image(#[from] ImageError),
}
