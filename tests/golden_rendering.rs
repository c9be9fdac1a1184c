use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rfplacard::assets::BackgroundImage;
use rfplacard::rendering::compositor::compose;
use rfplacard::rendering::layout::FixedAdvance;
use rfplacard::rendering::raster::Rasterizer;
use rfplacard::rendering::Frame;
use rfplacard::{BackgroundVariant, CanvasSize, RenderConfig};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

/// Compare the frame digest with a stored golden, writing it when
/// `UPDATE_GOLDENS` is set and skipping when it does not exist yet.
fn check_golden(name: &str, frame: &Frame) {
    let expected_path = golden_path(name);
    let digest = frame.digest();
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let exp = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, exp.trim(), "{} differs from golden", name);
}

/// Fonts are left out so the frames only depend on the compositor geometry
/// and the raster fills. Glyph placement is checked against the bundled
/// Fira Mono in `tests/rendering_smoke.rs` and the raster unit tests.
fn render(cfg: &RenderConfig, background: Option<Arc<BackgroundImage>>) -> Frame {
    let size = CanvasSize::for_background(background.as_deref());
    let list = compose(cfg, background.as_ref(), size, &mut FixedAdvance::em());
    Rasterizer::with_font_data(Vec::new())
        .rasterize(&list, size)
        .expect("rasterize")
}

fn gradient_background() -> Arc<BackgroundImage> {
    let img = image::RgbaImage::from_fn(96, 64, |x, y| {
        image::Rgba([(x * 2) as u8, (y * 3) as u8, 128, 255])
    });
    Arc::new(BackgroundImage::from_rgba(&img).expect("background"))
}

#[test]
fn golden_fallback_fill_with_footer_divider() {
    let cfg = RenderConfig {
        text: "日本は[g]再び[/g]".into(),
        footer_text: "中国外交部報道官 2025年1月2日".into(),
        footer_size: 8.0,
        ..Default::default()
    };
    let frame = render(&cfg, None);
    assert_eq!(frame.size(), CanvasSize::default());
    check_golden("fallback_footer.sha256", &frame);
}

#[test]
fn golden_background_image() {
    let cfg = RenderConfig {
        background: BackgroundVariant::Spokesperson,
        footer_text: "caption".into(),
        footer_size: 4.0,
        ..Default::default()
    };
    let frame = render(&cfg, Some(gradient_background()));
    assert_eq!(frame.size(), CanvasSize::new(96, 64));
    check_golden("background_image.sha256", &frame);
}

#[test]
fn repeated_renders_are_identical() {
    let cfg = RenderConfig {
        footer_text: "x".into(),
        ..Default::default()
    };
    let bg = gradient_background();
    let a = render(&cfg, Some(Arc::clone(&bg)));
    let b = render(&cfg, Some(bg));
    assert_eq!(a.digest(), b.digest());
}
