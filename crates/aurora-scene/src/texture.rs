//! Decoded RGBA8 textures shared between materials.

use std::path::PathBuf;
use std::sync::Arc;

/// Shared, immutable texture. Identity (not content) decides whether a
/// material needs rebinding.
pub type TextureHandle = Arc<Texture>;

/// An RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// Debug label, usually the source URL.
    pub label: String,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub pixels: Vec<u8>,
}

/// Errors that can occur while producing a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The source file could not be read.
    #[error("failed to read texture {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a supported image format.
    #[error("failed to decode texture: {0}")]
    Decode(#[from] image::ImageError),

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the dimensions.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// The loader was shut down before the request could be queued.
    #[error("texture loader is shut down")]
    LoaderShutDown,
}

impl Texture {
    /// Wrap raw RGBA8 pixels, validating the buffer size.
    pub fn from_rgba(
        label: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                actual: pixels.len(),
                expected,
                width,
                height,
            });
        }
        Ok(Self {
            label: label.into(),
            width,
            height,
            pixels,
        })
    }

    /// 1x1 texture of a single color.
    pub fn solid(label: impl Into<String>, rgba: [u8; 4]) -> Self {
        Self {
            label: label.into(),
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }

    /// Decode an encoded image (PNG, JPEG) into RGBA8.
    pub fn decode(label: impl Into<String>, bytes: &[u8]) -> Result<Self, TextureError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(label, width, height, image.into_raw())
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}
