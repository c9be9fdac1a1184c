//! Raw form values and their conversion into a `RenderConfig`
//!
//! A host UI hands over every control as the string it currently holds.
//! Numbers are read the way a browser form would read them (the longest
//! numeric prefix wins, so `"80px"` is 80) and a value that is missing,
//! non-numeric or zero takes its default.

use serde::{Deserialize, Serialize};

use crate::assets::{BackgroundVariant, FlagCatalog};
use crate::{FlagPair, FontFamily, Passes, QuoteMode, RenderConfig, HIGHLIGHT_COLOR};

pub const DEFAULT_FONT_SIZE: f32 = 80.0;
pub const DEFAULT_LINE_HEIGHT: f32 = 1.25;
pub const DEFAULT_MARGIN_PERCENT: f32 = 10.0;
pub const DEFAULT_START_Y_PERCENT: f32 = 20.0;
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_SHADOW_BLUR: f32 = 0.0;
pub const DEFAULT_FOOTER_SIZE: f32 = 32.0;

/// Form controls as strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormValues {
    pub text: String,
    pub font_family: String,
    pub font_size: String,
    pub line_height: String,
    /// Percent of the width
    pub margin_x: String,
    /// Percent of the height
    pub start_y: String,
    pub quote_mode: String,
    pub text_color: String,
    pub shadow_blur: String,
    pub background: String,
    /// Flag codes (`CN`, `JP`, ...)
    pub flag1: String,
    pub flag2: String,
    pub footer_text: String,
    pub footer_size: String,
}

impl FormValues {
    /// Build a render snapshot, resolving flag codes against `catalog`.
    pub fn to_render_config(&self, catalog: &FlagCatalog) -> RenderConfig {
        let flags = if self.flag1.trim().is_empty() && self.flag2.trim().is_empty() {
            catalog.default_pair()
        } else {
            FlagPair {
                left: catalog.emoji_or_first(&self.flag1).to_string(),
                right: catalog.emoji_or_first(&self.flag2).to_string(),
            }
        };

        let background = if self.background.trim().is_empty() {
            BackgroundVariant::default()
        } else {
            self.background.parse().unwrap_or_else(|e| {
                log::warn!("{}; using {}", e, BackgroundVariant::default());
                BackgroundVariant::default()
            })
        };

        let text_color = if self.text_color.trim().is_empty() {
            DEFAULT_TEXT_COLOR.to_string()
        } else {
            self.text_color.trim().to_string()
        };

        RenderConfig {
            text: self.text.clone(),
            font_family: FontFamily::from_key(&self.font_family),
            font_size: int_or(&self.font_size, DEFAULT_FONT_SIZE),
            font_weight: 700,
            line_height: float_or(&self.line_height, DEFAULT_LINE_HEIGHT),
            margin_x: float_or(&self.margin_x, DEFAULT_MARGIN_PERCENT) / 100.0,
            start_y: float_or(&self.start_y, DEFAULT_START_Y_PERCENT) / 100.0,
            quote_mode: QuoteMode::from_key(&self.quote_mode),
            text_color,
            highlight_color: HIGHLIGHT_COLOR.to_string(),
            shadow_blur: int_or(&self.shadow_blur, DEFAULT_SHADOW_BLUR).max(0.0),
            background,
            flags,
            footer_text: self.footer_text.clone(),
            footer_size: int_or(&self.footer_size, DEFAULT_FOOTER_SIZE),
            passes: Passes::default(),
        }
    }
}

/// Leading decimal integer of `s`, if any.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

/// Leading decimal number of `s` (sign, digits, fraction, exponent), if any.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(s.starts_with(['+', '-']));
    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    s[..end].parse().ok()
}

/// Integer field with a default for missing, non-numeric or zero values.
pub fn int_or(s: &str, default: f32) -> f32 {
    match parse_leading_int(s) {
        Some(v) if v != 0 => v as f32,
        _ => default,
    }
}

/// Float field with a default for missing, non-numeric or zero values.
pub fn float_or(s: &str, default: f32) -> f32 {
    match parse_leading_float(s) {
        Some(v) if v != 0.0 && v.is_finite() => v as f32,
        _ => default,
    }
}
