use std::path::Path;

use denoise_image::{Image, ImageSize};

use crate::error::IoError;

/// An 8-bit image as decoded from a file.
#[derive(Debug, Clone, PartialEq)]
pub enum GenericImage {
    /// 8-bit grayscale image
    Mono8(Image<u8, 1>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
}

impl GenericImage {
    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::Mono8(image) => image.size(),
            GenericImage::Rgb8(image) => image.size(),
        }
    }

    /// The number of channels of the image.
    pub fn num_channels(&self) -> usize {
        match self {
            GenericImage::Mono8(image) => image.num_channels(),
            GenericImage::Rgb8(image) => image.num_channels(),
        }
    }
}

fn decode(file_path: &Path) -> Result<image::DynamicImage, IoError> {
    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {} as {:?} {}x{}",
        file_path.display(),
        img.color(),
        img.width(),
        img.height()
    );

    Ok(img)
}

fn size_of(img: &image::DynamicImage) -> ImageSize {
    ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    }
}

/// Reads an image from the given file path.
///
/// The method reads any image format supported by the image crate. 8-bit grayscale files
/// are returned as [`GenericImage::Mono8`], anything else is converted to
/// [`GenericImage::Rgb8`].
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be decoded.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let img = decode(file_path.as_ref())?;
    let size = size_of(&img);

    let image = match img.color() {
        image::ColorType::L8 => GenericImage::Mono8(Image::new(size, img.into_luma8().into_raw())?),
        _ => GenericImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
    };

    Ok(image)
}

/// Reads an image from the given file path and converts it to 8-bit grayscale.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
pub fn read_image_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let img = decode(file_path.as_ref())?;
    let size = size_of(&img);
    Ok(Image::new(size, img.into_luma8().into_raw())?)
}

/// Writes a grayscale image to the given file path.
///
/// The format is chosen from the file extension.
pub fn write_image_mono8(file_path: impl AsRef<Path>, image: &Image<u8, 1>) -> Result<(), IoError> {
    write_raw(file_path.as_ref(), image.as_slice(), image.size(), image::ColorType::L8)
}

/// Writes an RGB image to the given file path.
///
/// The format is chosen from the file extension.
pub fn write_image_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    write_raw(file_path.as_ref(), image.as_slice(), image.size(), image::ColorType::Rgb8)
}

/// Writes any decoded image to the given file path.
///
/// The format is chosen from the file extension.
pub fn write_image(file_path: impl AsRef<Path>, image: &GenericImage) -> Result<(), IoError> {
    match image {
        GenericImage::Mono8(image) => write_image_mono8(file_path, image),
        GenericImage::Rgb8(image) => write_image_rgb8(file_path, image),
    }
}

fn write_raw(
    file_path: &Path,
    data: &[u8],
    size: ImageSize,
    color: image::ColorType,
) -> Result<(), IoError> {
    image::save_buffer(
        file_path,
        data,
        size.width as u32,
        size.height as u32,
        color,
    )?;
    log::debug!("wrote {} ({size})", file_path.display());
    Ok(())
}
