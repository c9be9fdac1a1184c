use std::sync::Arc;

use rfplacard::assets::{AssetSource, DirAssetSource, NoopAssetSource};
use rfplacard::async_api::{load_assets, StudioHandle};
use rfplacard::rendering::raster::FontSource;
use rfplacard::{BackgroundVariant, Language, RenderConfig};

#[tokio::test]
async fn loads_background_and_flags_concurrently() {
    let dir = tempfile::tempdir().unwrap();
    image::RgbaImage::from_pixel(30, 20, image::Rgba([0, 0, 255, 255]))
        .save(dir.path().join("background2.png"))
        .unwrap();

    let source: Arc<dyn AssetSource> = Arc::new(DirAssetSource::new(dir.path()));
    let assets = load_assets(source, BackgroundVariant::Defense).await;
    let bg = assets.background.expect("background loaded");
    assert_eq!((bg.width(), bg.height()), (30, 20));
    assert!(assets.flags.is_fallback());
}

#[tokio::test]
async fn missing_assets_fall_back() {
    let assets = load_assets(Arc::new(NoopAssetSource::new()), BackgroundVariant::Spokesperson).await;
    assert!(assets.background.is_none());
    assert_eq!(assets.flags.flags().len(), 8);
}

#[tokio::test]
async fn studio_handle_renders_on_worker() {
    let handle = StudioHandle::new(Language::Korean, FontSource::Data(Vec::new()))
        .await
        .unwrap();

    let cfg = handle.config().await.unwrap();
    assert!(cfg.footer_text.starts_with("중국 외교부 대변인"));

    handle
        .configure(RenderConfig {
            text: "abc".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(handle.highlight(0..1).await.unwrap(), Some(8));
    assert_eq!(handle.config().await.unwrap().text, "[g]a[/g]bc");

    let png = handle.render_png().await.unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1080, 1080));

    let jpeg = handle.export_jpeg().await.unwrap();
    let decoded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (540, 540));

    handle.clone().close().await.unwrap();
    assert!(handle.render_png().await.is_err());
}

#[tokio::test]
async fn studio_handle_follows_loaded_background() {
    let dir = tempfile::tempdir().unwrap();
    image::RgbaImage::from_pixel(40, 30, image::Rgba([0, 0, 255, 255]))
        .save(dir.path().join("background2.png"))
        .unwrap();
    let source: Arc<dyn AssetSource> = Arc::new(DirAssetSource::new(dir.path()));

    let handle = StudioHandle::new(Language::Japanese, FontSource::Data(Vec::new()))
        .await
        .unwrap();
    assert_eq!(handle.config().await.unwrap().background, BackgroundVariant::ForeignAffairs);

    handle
        .load_assets(Arc::clone(&source), BackgroundVariant::Defense)
        .await
        .unwrap();
    let cfg = handle.config().await.unwrap();
    assert_eq!(cfg.background, BackgroundVariant::Defense);
    assert!(cfg.footer_text.starts_with("中国国防部報道官 "));
    let png = handle.render_png().await.unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (40, 30));

    // switching the background through configure drops the defense image
    handle
        .configure(RenderConfig {
            background: BackgroundVariant::Spokesperson,
            ..cfg
        })
        .await
        .unwrap();
    let png = handle.render_png().await.unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1080, 1080));

    handle.close().await.unwrap();
}
