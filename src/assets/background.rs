//! Background templates and decoded background images

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tiny_skia::{ColorU8, Pixmap, PixmapRef};

use crate::{Error, Result};

/// The selectable poster backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundVariant {
    /// Foreign-affairs press briefing (default)
    #[default]
    ForeignAffairs,
    /// Defense-ministry press briefing
    Defense,
    /// Spokesperson portrait; the only variant that shows the flag pair
    Spokesperson,
}

impl BackgroundVariant {
    pub const ALL: [BackgroundVariant; 3] = [
        BackgroundVariant::ForeignAffairs,
        BackgroundVariant::Defense,
        BackgroundVariant::Spokesperson,
    ];

    /// Asset file holding this background.
    pub fn file_name(self) -> &'static str {
        match self {
            BackgroundVariant::ForeignAffairs => "background.png",
            BackgroundVariant::Defense => "background2.png",
            BackgroundVariant::Spokesperson => "background3.png",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            BackgroundVariant::ForeignAffairs => "foreign-affairs",
            BackgroundVariant::Defense => "defense",
            BackgroundVariant::Spokesperson => "spokesperson",
        }
    }

    pub fn shows_flags(self) -> bool {
        self == BackgroundVariant::Spokesperson
    }
}

impl fmt::Display for BackgroundVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BackgroundVariant {
    type Err = Error;

    /// Accepts either the variant key or its asset file name.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        BackgroundVariant::ALL
            .into_iter()
            .find(|v| v.key() == s || v.file_name() == s)
            .ok_or_else(|| Error::ConfigError(format!("unknown background {:?}", s)))
    }
}

/// A decoded background held as a premultiplied pixmap, ready to draw.
#[derive(Clone)]
pub struct BackgroundImage {
    pixmap: Pixmap,
}

impl BackgroundImage {
    /// Decode PNG or JPEG bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Self::from_rgba(&decoded.to_rgba8())
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::AssetUnavailable(format!("{}: {}", path.display(), e)))?;
        Self::decode(&bytes)
    }

    pub fn from_rgba(img: &image::RgbaImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        let mut pixmap = Pixmap::new(width, height).ok_or(Error::InvalidSize { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn variant_keys_and_files_parse() {
        assert_eq!("defense".parse::<BackgroundVariant>().unwrap(), BackgroundVariant::Defense);
        assert_eq!(
            "background3.png".parse::<BackgroundVariant>().unwrap(),
            BackgroundVariant::Spokesperson
        );
        assert!("background9.png".parse::<BackgroundVariant>().is_err());
        assert!(BackgroundVariant::Spokesperson.shows_flags());
        assert!(!BackgroundVariant::ForeignAffairs.shows_flags());
    }

    #[test]
    fn decode_keeps_natural_size() {
        let bg = BackgroundImage::decode(&png_bytes(7, 3)).unwrap();
        assert_eq!((bg.width(), bg.height()), (7, 3));
        let px = bg.pixmap().pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (10, 20, 30, 255));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(BackgroundImage::decode(b"nope"), Err(Error::ImageDecode(_))));
    }
}
