//! Export adapter: half-size JPEG for download
//!
//! The rendered frame is downsampled to `EXPORT_SCALE`, flattened to RGB and
//! encoded at `JPEG_QUALITY`. Saving never fails loudly: if encoding or
//! writing fails the save is abandoned and nothing is written.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use crate::rendering::Frame;
use crate::{Error, Result};

pub const EXPORT_SCALE: f32 = 0.5;
pub const JPEG_QUALITY: u8 = 92;
pub const EXPORT_FILE_NAME: &str = "propaganda.jpg";

/// Export dimensions for a frame (never below 1x1).
pub fn export_size(width: u32, height: u32) -> (u32, u32) {
    let scale = |v: u32| ((v as f32 * EXPORT_SCALE) as u32).max(1);
    (scale(width), scale(height))
}

/// Downsample and encode `frame` as JPEG bytes.
pub fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>> {
    let (w, h) = export_size(frame.width(), frame.height());
    let scaled = image::imageops::resize(&frame.to_rgba_image(), w, h, FilterType::Triangle);
    let rgb = DynamicImage::ImageRgba8(scaled).to_rgb8();

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| Error::ExportError(e.to_string()))?;
    Ok(out.into_inner())
}

/// `data:` URL holding the exported JPEG.
pub fn to_data_url(frame: &Frame) -> Result<String> {
    let jpeg = encode_jpeg(frame)?;
    Ok(format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(jpeg)
    ))
}

/// Write the export to `dir/propaganda.jpg`. Returns the written path, or
/// `None` when the save was abandoned.
pub fn save_to_dir(frame: &Frame, dir: impl AsRef<Path>) -> Option<PathBuf> {
    save_as(frame, dir.as_ref().join(EXPORT_FILE_NAME))
}

/// Write the export to an explicit path, abandoning silently on failure.
pub fn save_as(frame: &Frame, path: impl Into<PathBuf>) -> Option<PathBuf> {
    let path = path.into();
    let jpeg = match encode_jpeg(frame) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Export abandoned: {}", e);
            return None;
        }
    };
    match std::fs::write(&path, jpeg) {
        Ok(()) => {
            log::info!("Saved {}", path.display());
            Some(path)
        }
        Err(e) => {
            log::warn!("Export abandoned, could not write {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_size_halves_and_floors() {
        assert_eq!(export_size(1080, 1350), (540, 675));
        assert_eq!(export_size(3, 1), (1, 1));
    }
}
