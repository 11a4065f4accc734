//! Image inputs: format detection and decoding.

use deckgen_core::{Error, Result};
use std::fs;
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Detect the format from the leading bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Gif => Some(Self::Gif),
            image::ImageFormat::Bmp => Some(Self::Bmp),
            _ => None,
        }
    }

    fn codec(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Gif => image::ImageFormat::Gif,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }

    /// File extension used for the media part.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

/// An image ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,

    /// Pixel size; unknown for images built by hand.
    pub dimensions: Option<(u32, u32)>,
}

impl ImageData {
    /// Read and identify an image file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            Error::ImageInsertion(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        Self::from_bytes(bytes).map_err(|e| match e {
            Error::ImageInsertion(msg) => {
                Error::ImageInsertion(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Identify and decode an in-memory image.
    ///
    /// The whole image is decoded so that truncated or corrupt files are
    /// rejected here rather than embedded.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = ImageFormat::detect(&bytes)
            .ok_or_else(|| Error::ImageInsertion("unsupported image format".to_string()))?;

        let decoded = image::load_from_memory_with_format(&bytes, format.codec())
            .map_err(|e| {
                Error::ImageInsertion(format!("corrupt {} image: {}", format.extension(), e))
            })?;
        let (width, height) = (decoded.width(), decoded.height());

        Ok(Self {
            bytes,
            format,
            dimensions: (width > 0 && height > 0).then_some((width, height)),
        })
    }
}
