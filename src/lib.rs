//! RFox Placard
//!
//! A headless poster renderer. Multiline text with `[g]...[/g]` highlight
//! markup is tokenized into coloured characters, wrapped greedily to the
//! poster width, and composited over a background template together with an
//! optional flag pair and a footer caption.
//!
//! # Pipeline
//!
//! - **Markup** ([`rendering::markup`]): text → coloured rendering units
//! - **Layout** ([`rendering::layout`]): units + glyph advances → wrapped lines
//! - **Compositor** ([`rendering::compositor`]): config → display list
//!   (background, flags, main text, footer)
//! - **Raster** ([`rendering::raster`]): display list → pixels via `tiny-skia`
//!   and `cosmic-text`
//! - **Export** ([`export`]): half-size JPEG ready to save
//!
//! # Example
//!
//! ```no_run
//! use rfplacard::{assets::NoopAssetSource, studio::Studio, Language};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut studio = Studio::new(Language::English);
//! studio.load_assets(&NoopAssetSource::new());
//! studio.config_mut().text = "Hello [g]world[/g]".to_string();
//! let frame = studio.render()?;
//! let jpeg = rfplacard::export::encode_jpeg(&frame)?;
//! std::fs::write(rfplacard::export::EXPORT_FILE_NAME, jpeg)?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod assets;
pub mod config;
pub mod editor;
pub mod export;
pub mod rendering;
pub mod studio;

// Async asset loading on the tokio blocking pool
pub mod async_api;

// HTTP asset source
#[cfg(feature = "remote")]
pub mod remote;

pub use assets::{BackgroundVariant, Language};
pub use rendering::paint::{FontFamily, Rgba};

/// Highlight colour painted inside `[g]...[/g]`.
pub const HIGHLIGHT_COLOR: &str = "#D8AE5C";

/// Pixel dimensions of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The surface takes the natural size of the loaded background.
    pub fn for_background(background: Option<&assets::BackgroundImage>) -> Self {
        background
            .map(|bg| Self::new(bg.width(), bg.height()))
            .unwrap_or_default()
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
        }
    }
}

/// Whether the main text is wrapped in paired quotation marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteMode {
    #[default]
    None,
    Both,
}

impl QuoteMode {
    /// Unknown values select `None`.
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "both" => QuoteMode::Both,
            _ => QuoteMode::None,
        }
    }
}

/// The two flag glyphs drawn on the spokesperson background
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPair {
    pub left: String,
    pub right: String,
}

impl Default for FlagPair {
    fn default() -> Self {
        Self {
            left: "🇨🇳".to_string(),
            right: "🇯🇵".to_string(),
        }
    }
}

/// Per-pass switches. All passes are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Passes {
    pub background: bool,
    pub flags: bool,
    pub main_text: bool,
    pub footer: bool,
}

impl Default for Passes {
    fn default() -> Self {
        Self {
            background: true,
            flags: true,
            main_text: true,
            footer: true,
        }
    }
}

/// Read-only style snapshot for one render
///
/// Ratios (`margin_x`, `start_y`) are fractions of the surface size so the
/// layout is resolution independent; font sizes are absolute pixels.
///
/// ```
/// let cfg = rfplacard::RenderConfig::default();
/// assert_eq!(cfg.font_size, 80.0);
/// assert_eq!(cfg.highlight_color, rfplacard::HIGHLIGHT_COLOR);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Poster text with optional `[g]...[/g]` markup
    pub text: String,
    pub font_family: FontFamily,
    pub font_size: f32,
    pub font_weight: u16,
    /// Line advance as a multiple of `font_size`
    pub line_height: f32,
    /// Horizontal margin on each side, as a fraction of the width
    pub margin_x: f32,
    /// Top of the first line, as a fraction of the height
    pub start_y: f32,
    pub quote_mode: QuoteMode,
    pub text_color: String,
    pub highlight_color: String,
    /// Drop-shadow blur in pixels (0 disables the shadow)
    pub shadow_blur: f32,
    pub background: BackgroundVariant,
    pub flags: FlagPair,
    pub footer_text: String,
    pub footer_size: f32,
    pub passes: Passes,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: FontFamily::Sans,
            font_size: config::DEFAULT_FONT_SIZE,
            font_weight: 700,
            line_height: config::DEFAULT_LINE_HEIGHT,
            margin_x: config::DEFAULT_MARGIN_PERCENT / 100.0,
            start_y: config::DEFAULT_START_Y_PERCENT / 100.0,
            quote_mode: QuoteMode::None,
            text_color: config::DEFAULT_TEXT_COLOR.to_string(),
            highlight_color: HIGHLIGHT_COLOR.to_string(),
            shadow_blur: 0.0,
            background: BackgroundVariant::ForeignAffairs,
            flags: FlagPair::default(),
            footer_text: String::new(),
            footer_size: config::DEFAULT_FOOTER_SIZE,
            passes: Passes::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.line_height, 1.25);
        assert_eq!(config.margin_x, 0.10);
        assert_eq!(config.start_y, 0.20);
        assert_eq!(config.quote_mode, QuoteMode::None);
        assert!(config.passes.flags);
    }

    #[test]
    fn test_canvas_size() {
        assert_eq!(CanvasSize::default(), CanvasSize::new(1080, 1080));
        assert_eq!(CanvasSize::for_background(None), CanvasSize::default());
    }

    #[test]
    fn config_deserializes_partial_json() {
        let cfg: RenderConfig = serde_json::from_str(
            r#"{"text":"hi","quote_mode":"both","background":"spokesperson","passes":{"footer":false}}"#,
        )
        .unwrap();
        assert_eq!(cfg.quote_mode, QuoteMode::Both);
        assert_eq!(cfg.background, BackgroundVariant::Spokesperson);
        assert!(!cfg.passes.footer);
        assert!(cfg.passes.main_text);
        assert_eq!(cfg.font_size, 80.0);
    }
}
