//! Rendering pipeline: markup → layout → compositor → raster

pub mod compositor;
pub mod layout;
pub mod markup;
pub mod paint;
pub mod raster;

use sha2::{Digest, Sha256};
use tiny_skia::Pixmap;

use crate::{CanvasSize, Error, Result};
use paint::Rgba;

/// A rendered surface (premultiplied RGBA).
#[derive(Debug, Clone)]
pub struct Frame {
    pixmap: Pixmap,
}

impl Frame {
    /// A transparent frame of the given size.
    pub fn new(size: CanvasSize) -> Result<Self> {
        let pixmap = Pixmap::new(size.width, size.height).ok_or(Error::InvalidSize {
            width: size.width,
            height: size.height,
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width(), self.height())
    }

    /// Straight-alpha colour at `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut out = image::RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::RenderError(format!("PNG encoding failed: {}", e)))
    }

    /// Hex SHA-256 of the raw pixel data, for golden comparisons.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width().to_le_bytes());
        hasher.update(self.height().to_le_bytes());
        hasher.update(self.pixmap.data());
        hex::encode(hasher.finalize())
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_transparent() {
        let f = Frame::new(CanvasSize::new(128, 64)).unwrap();
        assert_eq!(f.width(), 128);
        assert_eq!(f.height(), 64);
        assert_eq!(f.pixel(5, 5), Some(Rgba::rgba(0, 0, 0, 0)));
        assert!(f.pixel(128, 0).is_none());
        assert!(f.pixel(0, 64).is_none());
        assert!(f.pixel(127, 63).is_some());
    }

    #[test]
    fn pixel_past_row_end_does_not_wrap() {
        let mut f = Frame::new(CanvasSize::new(4, 2)).unwrap();
        f.pixmap_mut().fill(tiny_skia::Color::from_rgba8(0, 0, 0, 0));
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(255, 0, 0, 255);
        let rect = tiny_skia::Rect::from_xywh(0.0, 1.0, 1.0, 1.0).unwrap();
        f.pixmap_mut().fill_rect(rect, &paint, tiny_skia::Transform::identity(), None);
        assert_eq!(f.pixel(0, 1), Some(Rgba::rgb(255, 0, 0)));
        // (4, 0) would alias (0, 1) if rows wrapped
        assert_eq!(f.pixel(4, 0), None);
    }

    #[test]
    fn zero_sized_frame_is_rejected() {
        assert!(matches!(
            Frame::new(CanvasSize::new(0, 10)),
            Err(Error::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn digest_depends_on_content() {
        let a = Frame::new(CanvasSize::new(4, 4)).unwrap();
        let mut b = a.clone();
        assert_eq!(a.digest(), b.digest());
        b.pixmap_mut().fill(tiny_skia::Color::WHITE);
        assert_ne!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }
}
