//! Highlight markup tokenizer.
//!
//! Text may contain `[g]` and `[/g]` markers. They toggle between the base and
//! highlight colours and are never emitted themselves. There is no nesting:
//! a second `[g]` while highlighted is a plain overwrite and any `[/g]`
//! returns to the base colour. An unclosed `[g]` runs to the end of the text.

use super::paint::Rgba;

pub const HIGHLIGHT_OPEN: &str = "[g]";
pub const HIGHLIGHT_CLOSE: &str = "[/g]";

/// One drawable character and the colour it is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderingUnit {
    pub ch: char,
    pub color: Rgba,
}

impl RenderingUnit {
    pub fn is_newline(&self) -> bool {
        self.ch == '\n'
    }
}

/// Convert marked-up text into a flat sequence of coloured units.
pub fn tokenize(text: &str, base: Rgba, highlight: Rgba) -> Vec<RenderingUnit> {
    let mut units = Vec::with_capacity(text.len());
    let mut color = base;
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix(HIGHLIGHT_OPEN) {
            color = highlight;
            rest = after;
            continue;
        }
        if let Some(after) = rest.strip_prefix(HIGHLIGHT_CLOSE) {
            color = base;
            rest = after;
            continue;
        }
        units.push(RenderingUnit { ch, color });
        rest = &rest[ch.len_utf8()..];
    }

    units
}
