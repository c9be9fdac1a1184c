use base64::Engine as _;
use rfplacard::export::{encode_jpeg, save_as, save_to_dir, to_data_url, EXPORT_FILE_NAME};
use rfplacard::rendering::compositor::compose;
use rfplacard::rendering::layout::FixedAdvance;
use rfplacard::rendering::raster::Rasterizer;
use rfplacard::rendering::Frame;
use rfplacard::{CanvasSize, RenderConfig};

fn solid_frame(width: u32, height: u32) -> Frame {
    let size = CanvasSize::new(width, height);
    let cfg = RenderConfig::default();
    let list = compose(&cfg, None, size, &mut FixedAdvance::em());
    Rasterizer::with_font_data(Vec::new())
        .rasterize(&list, size)
        .unwrap()
}

#[test]
fn jpeg_is_half_size() {
    let jpeg = encode_jpeg(&solid_frame(200, 120)).unwrap();
    assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);

    let decoded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 60));
    let px = decoded.to_rgb8().get_pixel(50, 30).0;
    // #7a1010 survives the lossy round trip approximately
    assert!((px[0] as i32 - 0x7a).abs() < 8, "{:?}", px);
    assert!((px[1] as i32 - 0x10).abs() < 8, "{:?}", px);
}

#[test]
fn data_url_wraps_the_jpeg() {
    let frame = solid_frame(40, 40);
    let url = to_data_url(&frame).unwrap();
    let payload = url.strip_prefix("data:image/jpeg;base64,").unwrap();
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
    assert_eq!(bytes, encode_jpeg(&frame).unwrap());
}

#[test]
fn save_writes_propaganda_jpg() {
    let dir = tempfile::tempdir().unwrap();
    let path = save_to_dir(&solid_frame(64, 64), dir.path()).unwrap();
    assert_eq!(path, dir.path().join(EXPORT_FILE_NAME));
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn unwritable_target_abandons_silently() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("missing").join("poster.jpg");
    assert!(save_as(&solid_frame(16, 16), &target).is_none());
    assert!(!target.exists());
}
