//! Framebuffer screenshots.
//!
//! Encodes the raw RGB888 framebuffer as PNG. The format is forced
//! regardless of the path's extension so scripted captures always
//! produce the same artifact.

use std::fmt;
use std::path::Path;

use log::info;

use crate::ppu::{FRAMEBUFFER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};

#[derive(Debug)]
pub enum ScreenshotError {
    /// Buffer is not a whole 256x224 RGB888 frame.
    WrongSize { expected: usize, found: usize },
    Encode(image::ImageError),
}

impl fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenshotError::WrongSize { expected, found } => {
                write!(f, "framebuffer is {} bytes, expected {}", found, expected)
            }
            ScreenshotError::Encode(err) => write!(f, "PNG encode failed: {}", err),
        }
    }
}

impl std::error::Error for ScreenshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScreenshotError::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for ScreenshotError {
    fn from(err: image::ImageError) -> Self {
        ScreenshotError::Encode(err)
    }
}

/// Write `framebuffer` to `path` as a PNG.
pub fn save_png(framebuffer: &[u8], path: &Path) -> Result<(), ScreenshotError> {
    let image = image::RgbImage::from_raw(
        SCREEN_WIDTH as u32,
        SCREEN_HEIGHT as u32,
        framebuffer.to_vec(),
    )
    .ok_or(ScreenshotError::WrongSize {
        expected: FRAMEBUFFER_SIZE,
        found: framebuffer.len(),
    })?;

    image.save_with_format(path, image::ImageFormat::Png)?;
    info!("screenshot written to {}", path.display());
    Ok(())
}
