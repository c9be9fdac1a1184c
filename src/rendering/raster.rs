//! Rasterizer: executes a display list on a tiny-skia pixmap, shaping text with cosmic-text

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cosmic_text::fontdb;
use cosmic_text::{
    Attrs, Buffer, CacheKeyFlags, Command, Family, FontSystem, Metrics, Shaping, SwashCache,
    SwashContent, Weight,
};
use tiny_skia::{FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Transform};

use super::layout::TextMeasure;
use super::paint::{
    DisplayList, FontFamily, FontSpec, PaintCommand, Rgba, Shadow, TextAlign, TextBaseline,
};
use super::Frame;
use crate::assets::BackgroundImage;
use crate::{CanvasSize, Result};

type AdvanceKey = (String, FontFamily, u16, u32);

/// Measured widths kept before the cache is dropped and refilled.
const ADVANCE_CACHE_LIMIT: usize = 4096;

/// Owns the font system and glyph caches used to measure and paint text.
pub struct Rasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    families: HashMap<FontFamily, Option<String>>,
    advances: HashMap<AdvanceKey, f32>,
}

/// Where a rasterizer gets its fonts from.
#[derive(Debug, Clone, Default)]
pub enum FontSource {
    #[default]
    System,
    /// System fonts plus these directories
    Dirs(Vec<PathBuf>),
    /// Only these font files
    Data(Vec<Vec<u8>>),
}

/// Extents of shaped text relative to its alphabetic baseline.
struct TextExtents {
    width: f32,
    ascent: f32,
    descent: f32,
}

impl Rasterizer {
    /// A rasterizer using the system fonts.
    pub fn new() -> Self {
        Self::from_font_system(FontSystem::new())
    }

    /// System fonts plus every font found in `dirs`.
    pub fn with_font_dirs<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        for dir in dirs {
            db.load_fonts_dir(dir);
        }
        Self::from_font_system(FontSystem::new_with_locale_and_db("ja".to_string(), db))
    }

    /// Only the given font files; no system fonts. Gives reproducible output.
    pub fn with_font_data(fonts: Vec<Vec<u8>>) -> Self {
        let mut db = fontdb::Database::new();
        for data in fonts {
            db.load_font_data(data);
        }
        Self::from_font_system(FontSystem::new_with_locale_and_db("ja".to_string(), db))
    }

    pub fn from_source(source: FontSource) -> Self {
        match source {
            FontSource::System => Self::new(),
            FontSource::Dirs(dirs) => Self::with_font_dirs(&dirs),
            FontSource::Data(fonts) => Self::with_font_data(fonts),
        }
    }

    fn from_font_system(font_system: FontSystem) -> Self {
        log::debug!(target: "raster", "font database holds {} faces", font_system.db().len());
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            families: HashMap::new(),
            advances: HashMap::new(),
        }
    }

    /// Paint `list` onto a fresh frame of `size`.
    pub fn rasterize(&mut self, list: &DisplayList, size: CanvasSize) -> Result<Frame> {
        let mut frame = Frame::new(size)?;
        for cmd in list.iter() {
            self.execute(frame.pixmap_mut(), cmd);
        }
        Ok(frame)
    }

    fn execute(&mut self, pixmap: &mut Pixmap, cmd: &PaintCommand) {
        match cmd {
            PaintCommand::Clear => {
                log::debug!(target: "raster", "clear");
                pixmap.fill(tiny_skia::Color::TRANSPARENT);
            }
            PaintCommand::FillRect { x, y, width, height, color, .. } => {
                fill_rect(pixmap, *x, *y, *width, *height, *color);
            }
            PaintCommand::Image { image, x, y, width, height, .. } => {
                draw_image(pixmap, image, *x, *y, *width, *height);
            }
            PaintCommand::Text { x, y, text, font, color, align, baseline, shadow, .. } => {
                self.draw_text(pixmap, text, *x, *y, font, *color, *align, *baseline, shadow.as_ref());
            }
        }
    }

    /// First installed face of the family's stack, cached per family.
    fn resolve_family(&mut self, family: FontFamily) -> Option<String> {
        if let Some(resolved) = self.families.get(&family) {
            return resolved.clone();
        }
        let db = self.font_system.db();
        let resolved = family
            .faces()
            .iter()
            .find(|name| {
                db.faces()
                    .any(|face| face.families.iter().any(|(n, _)| n.as_str() == **name))
            })
            .map(|name| name.to_string())
            .or_else(|| {
                let generic_fam = generic_family(family);
                let generic = db.family_name(&generic_fam);
                let has_generic = db
                    .faces()
                    .any(|face| face.families.iter().any(|(n, _)| n.as_str() == generic));
                if has_generic {
                    log::debug!(target: "raster", "no face from {:?} installed, using generic family", family);
                    return None;
                }
                // neither the stack nor the generic family: take the first face
                let fallback = db
                    .faces()
                    .find_map(|face| face.families.first().map(|(n, _)| n.clone()));
                log::debug!(target: "raster", "no face from {:?} installed, falling back to {:?}", family, fallback);
                fallback
            });
        self.families.insert(family, resolved.clone());
        resolved
    }

    fn shape(&mut self, text: &str, font: &FontSpec) -> Option<Buffer> {
        if text.is_empty() || !(font.size_px > 0.0) {
            return None;
        }
        if self.font_system.db().faces().next().is_none() {
            log::debug!(target: "raster", "no fonts loaded, skipping {:?}", text);
            return None;
        }
        let name = self.resolve_family(font.family);
        let family = name.as_deref().map(Family::Name).unwrap_or(generic_family(font.family));
        let attrs = Attrs::new()
            .family(family)
            .weight(Weight(font.weight))
            .cache_key_flags(CacheKeyFlags::DISABLE_HINTING);

        let metrics = Metrics::new(font.size_px, font.size_px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);
        Some(buffer)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        pixmap: &mut Pixmap,
        text: &str,
        x: f32,
        y: f32,
        font: &FontSpec,
        color: Rgba,
        align: TextAlign,
        baseline: TextBaseline,
        shadow: Option<&Shadow>,
    ) {
        log::debug!(target: "raster", "fillText {:?} {} {}", text, x, y);
        let Some(buffer) = self.shape(text, font) else {
            return;
        };
        let ext = extents(&buffer, font);

        let origin_x = x + match align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -ext.width / 2.0,
        };
        let origin_y = y + match baseline {
            TextBaseline::Top => ext.ascent,
            TextBaseline::Middle => (ext.ascent - ext.descent) / 2.0,
            TextBaseline::Alphabetic => 0.0,
        };

        if let Some(shadow) = shadow.filter(|s| s.is_visible()) {
            self.draw_shadow(pixmap, &buffer, &ext, (origin_x, origin_y), shadow);
        }
        paint_glyphs(
            &mut self.font_system,
            &mut self.swash_cache,
            pixmap,
            &buffer,
            (origin_x, origin_y),
            color,
        );
    }

    /// Paint the glyphs in the shadow colour into a padded scratch pixmap,
    /// blur it and composite it under the text.
    fn draw_shadow(
        &mut self,
        pixmap: &mut Pixmap,
        buffer: &Buffer,
        ext: &TextExtents,
        origin: (f32, f32),
        shadow: &Shadow,
    ) {
        let sigma = shadow.blur / 2.0;
        let pad = (sigma * 3.0).ceil() + 1.0;
        let left = (origin.0 - pad).floor();
        let top = (origin.1 - ext.ascent - pad).floor();
        let w = (ext.width + pad * 2.0).ceil().max(1.0) as u32;
        let h = (ext.ascent + ext.descent + pad * 2.0).ceil().max(1.0) as u32;
        let Some(mut scratch) = Pixmap::new(w + 1, h + 1) else {
            return;
        };

        paint_glyphs(
            &mut self.font_system,
            &mut self.swash_cache,
            &mut scratch,
            buffer,
            (origin.0 - left, origin.1 - top),
            shadow.color,
        );
        box_blur(&mut scratch, sigma);
        pixmap.draw_pixmap(
            left as i32,
            top as i32,
            scratch.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for Rasterizer {
    fn advance(&mut self, text: &str, font: &FontSpec) -> f32 {
        let key = (text.to_string(), font.family, font.weight, font.size_px.to_bits());
        if let Some(w) = self.advances.get(&key) {
            return *w;
        }
        let width = self
            .shape(text, font)
            .map(|buffer| extents(&buffer, font).width)
            .unwrap_or(0.0);
        if self.advances.len() >= ADVANCE_CACHE_LIMIT {
            log::trace!(target: "raster", "advance cache full, clearing");
            self.advances.clear();
        }
        self.advances.insert(key, width);
        width
    }
}

fn generic_family(family: FontFamily) -> Family<'static> {
    if family.is_serif() {
        Family::Serif
    } else {
        Family::SansSerif
    }
}

fn extents(buffer: &Buffer, font: &FontSpec) -> TextExtents {
    let mut ext = TextExtents { width: 0.0, ascent: 0.0, descent: 0.0 };
    for run in buffer.layout_runs() {
        ext.width = ext.width.max(run.line_w);
        ext.ascent = ext.ascent.max(run.line_y - run.line_top);
        ext.descent = ext.descent.max(run.line_top + run.line_height - run.line_y);
    }
    if ext.ascent == 0.0 && ext.descent == 0.0 {
        ext.ascent = font.size_px * 0.8;
        ext.descent = font.size_px * 0.2;
    }
    ext
}

/// Paint shaped glyphs with their alphabetic baseline at `origin`. Outline
/// glyphs become filled paths; glyphs without outlines (colour emoji) are
/// blitted from their rasterized image.
fn paint_glyphs(
    font_system: &mut FontSystem,
    swash_cache: &mut SwashCache,
    pixmap: &mut Pixmap,
    buffer: &Buffer,
    origin: (f32, f32),
    color: Rgba,
) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;

    for run in buffer.layout_runs() {
        for glyph in run.glyphs.iter() {
            let physical = glyph.physical(origin, 1.0);
            let gx = origin.0 + glyph.x + glyph.font_size * glyph.x_offset;
            let gy = origin.1 + glyph.y - glyph.font_size * glyph.y_offset;

            if let Some(commands) = swash_cache.get_outline_commands(font_system, physical.cache_key) {
                // Font outlines are y-up
                let mut pb = PathBuilder::new();
                for cmd in commands {
                    match cmd {
                        Command::MoveTo(p) => pb.move_to(p.x, -p.y),
                        Command::LineTo(p) => pb.line_to(p.x, -p.y),
                        Command::QuadTo(c, p) => pb.quad_to(c.x, -c.y, p.x, -p.y),
                        Command::CurveTo(c1, c2, p) => pb.cubic_to(c1.x, -c1.y, c2.x, -c2.y, p.x, -p.y),
                        Command::Close => pb.close(),
                    }
                }
                if let Some(path) = pb.finish() {
                    pixmap.fill_path(
                        &path,
                        &paint,
                        tiny_skia::FillRule::Winding,
                        Transform::from_translate(gx, gy),
                        None,
                    );
                    continue;
                }
            }

            if let Some(image) = swash_cache.get_image_uncached(font_system, physical.cache_key) {
                let left = physical.x + image.placement.left;
                let top = physical.y - image.placement.top;
                let (w, h) = (image.placement.width as i32, image.placement.height as i32);
                for row in 0..h {
                    for col in 0..w {
                        let i = (row * w + col) as usize;
                        let src = match image.content {
                            SwashContent::Mask => color.with_alpha(image.data[i] as f32 / 255.0),
                            SwashContent::Color => {
                                let p = &image.data[i * 4..i * 4 + 4];
                                // colour glyphs keep their own colours but take the paint alpha
                                Rgba::rgba(p[0], p[1], p[2], p[3]).with_alpha(color.a as f32 / 255.0)
                            }
                            SwashContent::SubpixelMask => {
                                let p = &image.data[i * 4..i * 4 + 4];
                                let a = (p[0] as u16 + p[1] as u16 + p[2] as u16) / 3;
                                color.with_alpha(a as f32 / 255.0)
                            }
                        };
                        blend_pixel(pixmap, left + col, top + row, src);
                    }
                }
            }
        }
    }
}

/// Source-over a straight-alpha colour onto one premultiplied pixel.
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, src: Rgba) {
    if src.a == 0 || x < 0 || y < 0 || x as u32 >= pixmap.width() || y as u32 >= pixmap.height() {
        return;
    }
    let i = (y as usize * pixmap.width() as usize + x as usize) * 4;
    let data = pixmap.data_mut();
    let sa = src.a as u32;
    let inv = 255 - sa;
    let blend = |s: u8, d: u8| ((s as u32 * sa + d as u32 * inv + 127) / 255) as u8;
    data[i] = blend(src.r, data[i]);
    data[i + 1] = blend(src.g, data[i + 1]);
    data[i + 2] = blend(src.b, data[i + 2]);
    data[i + 3] = ((sa * 255 + data[i + 3] as u32 * inv + 127) / 255) as u8;
}

fn fill_rect(pixmap: &mut Pixmap, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
    let Some(rect) = Rect::from_xywh(x, y, width, height) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Draw `image` stretched to the target rectangle.
fn draw_image(pixmap: &mut Pixmap, image: &BackgroundImage, x: f32, y: f32, width: f32, height: f32) {
    if image.width() == 0 || image.height() == 0 {
        return;
    }
    let scale_x = width / image.width() as f32;
    let scale_y = height / image.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    let transform = Transform::from_translate(x, y).pre_scale(scale_x, scale_y);
    pixmap.draw_pixmap(0, 0, image.pixmap(), &paint, transform, None);
}

/// Three box-blur passes approximating a Gaussian of standard deviation `sigma`.
pub(crate) fn box_blur(pixmap: &mut Pixmap, sigma: f32) {
    if !(sigma > 0.0) {
        return;
    }
    let radius = ((sigma * sigma + 0.25).sqrt() - 0.5).round().max(1.0) as usize;
    let (w, h) = (pixmap.width() as usize, pixmap.height() as usize);
    let data = pixmap.data_mut();
    let mut tmp = vec![0u8; data.len()];
    for _ in 0..3 {
        box_pass(data, &mut tmp, h, w, w * 4, 4, radius);
        box_pass(&tmp, data, w, h, 4, w * 4, radius);
    }
}

/// One sliding-window pass along `lines` lines of `len` pixels each.
/// Pixels outside the buffer count as transparent.
fn box_pass(src: &[u8], dst: &mut [u8], lines: usize, len: usize, line_stride: usize, step: usize, r: usize) {
    let div = (2 * r + 1) as u32;
    for line in 0..lines {
        let base = line * line_stride;
        for c in 0..4 {
            let at = |i: usize| base + i * step + c;
            let mut sum: u32 = (0..=r.min(len - 1)).map(|i| src[at(i)] as u32).sum();
            for i in 0..len {
                dst[at(i)] = ((sum + div / 2) / div) as u8;
                if i + r + 1 < len {
                    sum += src[at(i + r + 1)] as u32;
                }
                if i >= r {
                    sum -= src[at(i - r)] as u32;
                }
            }
        }
    }
}
