//! Layered poster compositor.
//!
//! `compose` turns a config snapshot into a display list in four passes:
//! background, flags, main text and footer. It is pure given its inputs; the
//! only capability it needs is a `TextMeasure` for glyph advances.

use std::borrow::Cow;
use std::sync::Arc;

use super::layout::{layout_units, Line, TextMeasure};
use super::markup::tokenize;
use super::paint::{
    DisplayList, FontFamily, FontSpec, Layer, PaintCommand, Rgba, Shadow, TextAlign, TextBaseline,
};
use crate::assets::BackgroundImage;
use crate::{CanvasSize, QuoteMode, RenderConfig};

/// Solid fill used while no background image is available.
pub const FALLBACK_BACKGROUND: Rgba = Rgba::rgb(0x7a, 0x10, 0x10);
pub const HIGHLIGHT: Rgba = Rgba::rgb(0xd8, 0xae, 0x5c);

pub const FLAG_SIZE_RATIO: f32 = 0.11;
pub const FLAG_Y_RATIO: f32 = 0.10;
pub const FLAG_SPACING_RATIO: f32 = 0.05;

pub const OPEN_QUOTE: char = '“';
pub const CLOSE_QUOTE: char = '”';

const TEXT_SHADOW: Rgba = Rgba::rgba(0, 0, 0, 217);
const FOOTER_SHADOW: Rgba = Rgba::rgba(0, 0, 0, 230);
const FOOTER_WEIGHT: u16 = 500;
const FOOTER_BOTTOM_RATIO: f32 = 0.06;
const DIVIDER_X_RATIO: f32 = 0.15;
const DIVIDER_WIDTH_RATIO: f32 = 0.70;
const DIVIDER_THICKNESS: f32 = 2.0;
const DIVIDER_ALPHA: f32 = 0.85;
/// Divider sits this many footer sizes above the caption baseline.
const DIVIDER_LIFT: f32 = 1.6;

/// A wrapped line and the top-left position it is painted at.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub y: f32,
    pub line: Line,
}

/// Strip surrounding whitespace, counting a byte-order mark as blank too.
pub fn trim_blank(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Main text after optional quote wrapping.
pub fn quoted_text(config: &RenderConfig) -> Cow<'_, str> {
    if config.quote_mode == QuoteMode::Both && !trim_blank(&config.text).is_empty() {
        Cow::Owned(format!("{}{}{}", OPEN_QUOTE, config.text, CLOSE_QUOTE))
    } else {
        Cow::Borrowed(&config.text)
    }
}

pub fn main_font(config: &RenderConfig) -> FontSpec {
    FontSpec::new(config.font_family, config.font_weight, config.font_size)
}

/// Tokenize, wrap and position the main text. Each line is centred on its own
/// width; lines advance by `font_size * line_height` from `start_y`.
pub fn layout_main_text<M: TextMeasure>(
    config: &RenderConfig,
    size: CanvasSize,
    measure: &mut M,
) -> Vec<PlacedLine> {
    let width = size.width as f32;
    let height = size.height as f32;
    let font = main_font(config);

    let area_x = width * config.margin_x;
    let max_width = width - area_x * 2.0;
    let base = Rgba::parse_or(&config.text_color, Rgba::WHITE);
    let highlight = Rgba::parse_or(&config.highlight_color, HIGHLIGHT);

    let text = quoted_text(config);
    let units = tokenize(&text, base, highlight);
    let lines = layout_units(&units, |ch| measure.char_advance(ch, &font), max_width);

    let line_px = config.font_size * config.line_height;
    let start_y = height * config.start_y;
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| PlacedLine {
            x: (width - line.width) / 2.0,
            y: start_y + line_px * i as f32,
            line,
        })
        .collect()
}

/// Build the full display list for one frame.
pub fn compose<M: TextMeasure>(
    config: &RenderConfig,
    background: Option<&Arc<BackgroundImage>>,
    size: CanvasSize,
    measure: &mut M,
) -> DisplayList {
    let mut list = DisplayList::new();
    list.push(PaintCommand::Clear);

    if config.passes.background {
        background_pass(&mut list, background, size);
    }
    if config.passes.flags {
        flag_pass(&mut list, config, size);
    }
    if config.passes.main_text {
        main_text_pass(&mut list, config, size, measure);
    }
    if config.passes.footer {
        footer_pass(&mut list, config, size);
    }

    log::debug!(
        "Composed {} commands for {}x{} ({})",
        list.len(),
        size.width,
        size.height,
        config.background
    );
    list
}

fn background_pass(list: &mut DisplayList, background: Option<&Arc<BackgroundImage>>, size: CanvasSize) {
    let (width, height) = (size.width as f32, size.height as f32);
    match background {
        Some(image) => list.push(PaintCommand::Image {
            layer: Layer::Background,
            image: Arc::clone(image),
            x: 0.0,
            y: 0.0,
            width,
            height,
        }),
        None => list.push(PaintCommand::FillRect {
            layer: Layer::Background,
            x: 0.0,
            y: 0.0,
            width,
            height,
            color: FALLBACK_BACKGROUND,
        }),
    }
}

fn flag_pass(list: &mut DisplayList, config: &RenderConfig, size: CanvasSize) {
    if !config.background.shows_flags() {
        return;
    }

    let (width, height) = (size.width as f32, size.height as f32);
    let flag_size = (width * FLAG_SIZE_RATIO).min(height * FLAG_SIZE_RATIO);
    let flag_y = height * FLAG_Y_RATIO;
    let spacing = width * FLAG_SPACING_RATIO;
    let left = (width - (flag_size * 2.0 + spacing)) / 2.0;
    let font = FontSpec::new(FontFamily::Flag, 400, flag_size);

    let centres = [left + flag_size / 2.0, left + flag_size + spacing + flag_size / 2.0];
    for (emoji, x) in [&config.flags.left, &config.flags.right].into_iter().zip(centres) {
        list.push(PaintCommand::Text {
            layer: Layer::Flags,
            x,
            y: flag_y,
            text: emoji.clone(),
            font,
            color: Rgba::BLACK,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            shadow: None,
        });
    }
}

fn main_text_pass<M: TextMeasure>(
    list: &mut DisplayList,
    config: &RenderConfig,
    size: CanvasSize,
    measure: &mut M,
) {
    let font = main_font(config);
    let shadow = Some(Shadow {
        color: TEXT_SHADOW,
        blur: config.shadow_blur,
    });

    for placed in layout_main_text(config, size, measure) {
        let mut x = placed.x;
        for unit in &placed.line.units {
            list.push(PaintCommand::Text {
                layer: Layer::MainText,
                x,
                y: placed.y,
                text: unit.ch.to_string(),
                font,
                color: unit.color,
                align: TextAlign::Left,
                baseline: TextBaseline::Top,
                shadow,
            });
            x += measure.char_advance(unit.ch, &font);
        }
    }
}

fn footer_pass(list: &mut DisplayList, config: &RenderConfig, size: CanvasSize) {
    let caption = trim_blank(&config.footer_text);
    if caption.is_empty() {
        return;
    }

    let (width, height) = (size.width as f32, size.height as f32);
    let color = Rgba::parse_or(&config.text_color, Rgba::WHITE);
    let y = height - height * FOOTER_BOTTOM_RATIO;

    list.push(PaintCommand::FillRect {
        layer: Layer::Footer,
        x: width * DIVIDER_X_RATIO,
        y: y - config.footer_size * DIVIDER_LIFT,
        width: width * DIVIDER_WIDTH_RATIO,
        height: DIVIDER_THICKNESS,
        color: color.with_alpha(DIVIDER_ALPHA),
    });
    list.push(PaintCommand::Text {
        layer: Layer::Footer,
        x: width / 2.0,
        y,
        text: caption.to_string(),
        font: FontSpec::new(FontFamily::Serif, FOOTER_WEIGHT, config.footer_size),
        color,
        align: TextAlign::Center,
        baseline: TextBaseline::Alphabetic,
        shadow: Some(Shadow {
            color: FOOTER_SHADOW,
            blur: config.shadow_blur,
        }),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::layout::FixedAdvance;
    use crate::BackgroundVariant;

    fn config(text: &str) -> RenderConfig {
        RenderConfig {
            text: text.to_string(),
            font_size: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn missing_background_falls_back_to_solid_fill() {
        let list = compose(&config(""), None, CanvasSize::new(100, 50), &mut FixedAdvance::em());
        assert!(matches!(list.commands[0], PaintCommand::Clear));
        let bg: Vec<_> = list.on_layer(Layer::Background).collect();
        assert_eq!(bg.len(), 1);
        match bg[0] {
            PaintCommand::FillRect { color, width, height, .. } => {
                assert_eq!(*color, FALLBACK_BACKGROUND);
                assert_eq!((*width, *height), (100.0, 50.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn flags_are_centred_as_a_pair() {
        let mut cfg = config("");
        cfg.background = BackgroundVariant::Spokesperson;
        let list = compose(&cfg, None, CanvasSize::new(1000, 2000), &mut FixedAdvance::em());
        let xs: Vec<f32> = list
            .on_layer(Layer::Flags)
            .filter_map(|c| match c {
                PaintCommand::Text { x, y, font, .. } => {
                    assert_eq!(*y, 200.0);
                    assert_eq!(font.size_px, 110.0);
                    Some(*x)
                }
                _ => None,
            })
            .collect();
        // pair width 2*110 + 50 = 270, left edge (1000 - 270) / 2 = 365
        assert_eq!(xs, vec![420.0, 580.0]);
    }

    #[test]
    fn lines_advance_by_line_height() {
        let cfg = config("ab\ncd");
        let lines = layout_main_text(&cfg, CanvasSize::new(200, 100), &mut FixedAdvance::em());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].y, 20.0);
        assert_eq!(lines[1].y, 32.5);
        assert_eq!(lines[0].x, 90.0);
    }

    #[test]
    fn footer_draws_divider_then_trimmed_caption() {
        let mut cfg = config("");
        cfg.footer_text = "  Spokesperson 2025  ".into();
        cfg.footer_size = 20.0;
        let list = compose(&cfg, None, CanvasSize::new(1000, 1000), &mut FixedAdvance::em());
        let footer: Vec<_> = list.on_layer(Layer::Footer).collect();
        assert_eq!(footer.len(), 2);
        match footer[0] {
            PaintCommand::FillRect { x, y, width, height, color, .. } => {
                assert_eq!((*x, *width, *height), (150.0, 700.0, 2.0));
                assert_eq!(*y, 940.0 - 32.0);
                assert_eq!(color.a, 217);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(list.texts(Layer::Footer), vec!["Spokesperson 2025"]);
    }

    #[test]
    fn blank_footer_and_disabled_passes_paint_nothing() {
        let mut cfg = config("text");
        cfg.footer_text = "   ".into();
        cfg.passes.main_text = false;
        cfg.passes.background = false;
        let list = compose(&cfg, None, CanvasSize::default(), &mut FixedAdvance::em());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn byte_order_mark_counts_as_blank() {
        let mut cfg = config("\u{feff}");
        cfg.quote_mode = QuoteMode::Both;
        assert_eq!(quoted_text(&cfg), "\u{feff}");

        cfg.text = "\u{feff} hi \u{feff}".into();
        assert_eq!(quoted_text(&cfg), format!("{}\u{feff} hi \u{feff}{}", OPEN_QUOTE, CLOSE_QUOTE));

        cfg.footer_text = "\u{feff}\n ".into();
        cfg.passes.main_text = false;
        cfg.passes.background = false;
        let list = compose(&cfg, None, CanvasSize::default(), &mut FixedAdvance::em());
        assert!(list.texts(Layer::Footer).is_empty());

        cfg.footer_text = "\u{feff}Spokesperson\u{feff}".into();
        let list = compose(&cfg, None, CanvasSize::default(), &mut FixedAdvance::em());
        assert_eq!(list.texts(Layer::Footer), vec!["Spokesperson"]);
    }
}
