#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use denoise_image as image;

#[doc(inline)]
pub use denoise_imgproc as imgproc;

#[doc(inline)]
pub use denoise_io as io;
