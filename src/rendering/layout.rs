//! Greedy line layout over per-character advances

use super::markup::RenderingUnit;
use super::paint::FontSpec;

/// A wrapped line of units and its measured width.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub units: Vec<RenderingUnit>,
    pub width: f32,
}

impl Line {
    fn empty() -> Self {
        Self { units: Vec::new(), width: 0.0 }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn text(&self) -> String {
        self.units.iter().map(|u| u.ch).collect()
    }
}

/// Glyph advance lookup. Implemented by the rasterizer with real fonts and by
/// `FixedAdvance` for headless use.
pub trait TextMeasure {
    /// Horizontal advance of `text` in pixels.
    fn advance(&mut self, text: &str, font: &FontSpec) -> f32;

    /// Advance of a single character.
    fn char_advance(&mut self, ch: char, font: &FontSpec) -> f32 {
        let mut buf = [0u8; 4];
        self.advance(ch.encode_utf8(&mut buf), font)
    }
}

impl<M: TextMeasure + ?Sized> TextMeasure for &mut M {
    fn advance(&mut self, text: &str, font: &FontSpec) -> f32 {
        (**self).advance(text, font)
    }
}

/// Every character advances by `font.size_px * ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    pub ratio: f32,
}

impl FixedAdvance {
    /// Full-width (1em) advance, the usual width of a CJK ideograph.
    pub fn em() -> Self {
        Self { ratio: 1.0 }
    }
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self::em()
    }
}

impl TextMeasure for FixedAdvance {
    fn advance(&mut self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size_px * self.ratio
    }
}

/// Wrap units into lines no wider than `max_width`.
///
/// A newline closes the current line (even an empty one) and is dropped.
/// A unit that would overflow starts a new line unless the current line is
/// empty, so a unit wider than `max_width` sits alone on its own line.
/// A trailing newline does not produce a trailing empty line.
pub fn layout_units<F>(units: &[RenderingUnit], mut measure: F, max_width: f32) -> Vec<Line>
where
    F: FnMut(char) -> f32,
{
    let mut lines = Vec::new();
    let mut current = Line::empty();

    for unit in units {
        if unit.is_newline() {
            lines.push(std::mem::replace(&mut current, Line::empty()));
            continue;
        }

        let w = measure(unit.ch);
        if current.width + w > max_width && !current.is_empty() {
            let full = std::mem::replace(&mut current, Line { units: vec![*unit], width: w });
            lines.push(full);
        } else {
            current.units.push(*unit);
            current.width += w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
