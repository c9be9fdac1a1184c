//! Paint command set produced by the compositor and consumed by the rasterizer

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::BackgroundImage;
use crate::{Error, Result};

/// A straight-alpha RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse any CSS colour (`#rgb`, `#rrggbb`, `rgba(..)`, named colours).
    pub fn parse(css: &str) -> Result<Self> {
        let color = csscolorparser::parse(css.trim())
            .map_err(|e| Error::InvalidColor(format!("{:?}: {}", css, e)))?;
        let [r, g, b, a] = color.to_rgba8();
        Ok(Self { r, g, b, a })
    }

    /// Parse a CSS colour, logging and returning `fallback` when it is invalid.
    pub fn parse_or(css: &str, fallback: Rgba) -> Self {
        match Self::parse(css) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}; using {}", e, fallback.to_hex());
                fallback
            }
        }
    }

    /// Multiply the alpha channel, as canvas `globalAlpha` does.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (self.a as f32 * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Named font stacks. Each resolves to a list of preferred faces followed by
/// a generic family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Serif,
    #[default]
    Sans,
    /// Stack used for flag emoji (`Arial, sans-serif`)
    Flag,
}

impl FontFamily {
    /// Map a form key to a stack; unknown keys select `Sans`.
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "serif" => FontFamily::Serif,
            "sans" => FontFamily::Sans,
            "flag" => FontFamily::Flag,
            _ => FontFamily::Sans,
        }
    }

    /// Preferred face names, most preferred first.
    pub fn faces(self) -> &'static [&'static str] {
        match self {
            FontFamily::Serif => &["Noto Serif JP", "Hiragino Mincho ProN", "Yu Mincho"],
            FontFamily::Sans => &["Noto Sans JP", "Hiragino Sans", "Yu Gothic"],
            FontFamily::Flag => &["Arial"],
        }
    }

    pub fn is_serif(self) -> bool {
        matches!(self, FontFamily::Serif)
    }
}

/// A resolved font request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    pub weight: u16,
    pub size_px: f32,
}

impl FontSpec {
    pub fn new(family: FontFamily, weight: u16, size_px: f32) -> Self {
        Self { family, weight, size_px }
    }

    /// CSS shorthand, e.g. `700 80px "Noto Sans JP","Hiragino Sans","Yu Gothic",sans-serif`.
    pub fn css(&self) -> String {
        let generic = if self.family.is_serif() { "serif" } else { "sans-serif" };
        let faces = self
            .family
            .faces()
            .iter()
            .map(|f| format!("\"{}\"", f))
            .collect::<Vec<_>>()
            .join(",");
        format!("{} {}px {},{}", self.weight, self.size_px, faces, generic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
}

/// Blurred drop shadow with zero offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f32,
}

impl Shadow {
    /// A shadow only paints when it is blurred (the offset is always zero).
    pub fn is_visible(&self) -> bool {
        self.blur > 0.0 && self.color.a > 0
    }
}

/// The compositor pass a command belongs to, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Flags,
    MainText,
    Footer,
}

#[derive(Debug, Clone)]
pub enum PaintCommand {
    /// Reset every pixel to transparent.
    Clear,
    FillRect {
        layer: Layer,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgba,
    },
    /// Draw an image stretched to the target rectangle.
    Image {
        layer: Layer,
        image: Arc<BackgroundImage>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Text {
        layer: Layer,
        x: f32,
        y: f32,
        text: String,
        font: FontSpec,
        color: Rgba,
        align: TextAlign,
        baseline: TextBaseline,
        shadow: Option<Shadow>,
    },
}

impl PaintCommand {
    pub fn layer(&self) -> Option<Layer> {
        match self {
            PaintCommand::Clear => None,
            PaintCommand::FillRect { layer, .. }
            | PaintCommand::Image { layer, .. }
            | PaintCommand::Text { layer, .. } => Some(*layer),
        }
    }
}

/// Ordered paint commands for one frame.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub commands: Vec<PaintCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: PaintCommand) {
        self.commands.push(cmd);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaintCommand> {
        self.commands.iter()
    }

    /// Commands painted by a given pass.
    pub fn on_layer(&self, layer: Layer) -> impl Iterator<Item = &PaintCommand> {
        self.commands.iter().filter(move |c| c.layer() == Some(layer))
    }

    /// Text runs painted by a given pass, in paint order.
    pub fn texts(&self, layer: Layer) -> Vec<&str> {
        self.on_layer(layer)
            .filter_map(|c| match c {
                PaintCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_rgba_colors() {
        assert_eq!(Rgba::parse("#D8AE5C").unwrap(), Rgba::rgb(0xd8, 0xae, 0x5c));
        let shadow = Rgba::parse("rgba(0,0,0,0.85)").unwrap();
        assert_eq!((shadow.r, shadow.g, shadow.b), (0, 0, 0));
        assert_eq!(shadow.a, 217);
        assert_eq!(Rgba::parse("white").unwrap(), Rgba::WHITE);
    }

    #[test]
    fn invalid_color_falls_back() {
        assert!(Rgba::parse("not-a-color").is_err());
        assert_eq!(Rgba::parse_or("not-a-color", Rgba::WHITE), Rgba::WHITE);
    }

    #[test]
    fn font_css_lists_faces_then_generic() {
        let f = FontSpec::new(FontFamily::Serif, 500, 32.0);
        assert_eq!(
            f.css(),
            "500 32px \"Noto Serif JP\",\"Hiragino Mincho ProN\",\"Yu Mincho\",serif"
        );
        assert_eq!(FontFamily::from_key("gothic"), FontFamily::Sans);
    }

    #[test]
    fn display_list_filters_by_layer() {
        let mut list = DisplayList::new();
        list.push(PaintCommand::Clear);
        list.push(PaintCommand::FillRect {
            layer: Layer::Background,
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            color: Rgba::BLACK,
        });
        assert_eq!(list.len(), 2);
        assert_eq!(list.on_layer(Layer::Background).count(), 1);
        assert!(list.texts(Layer::Footer).is_empty());
    }
}
