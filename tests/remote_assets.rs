#![cfg(feature = "remote")]

use rfplacard::assets::AssetSource;
use rfplacard::remote::HttpAssetSource;
use rfplacard::BackgroundVariant;
use tiny_http::{Response, Server};

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(12, 6, image::Rgba([1, 2, 3, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Serve `background3.png` and `flags.json` under `/assets/`; anything else is a 404.
fn start_server() -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let png = png_bytes();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let resp = match request.url() {
                "/assets/background3.png" => Response::from_data(png.clone()),
                "/assets/flags.json" => Response::from_data(
                    r#"[{"code":"JP","emoji":"🇯🇵","name":"Japan"}]"#.as_bytes().to_vec(),
                ),
                _ => Response::from_data(b"not found".to_vec()).with_status_code(404),
            };
            let _ = request.respond(resp);
        }
    });
    format!("http://{}/assets", addr)
}

#[test]
fn fetches_background_and_flags() {
    let source = HttpAssetSource::new(&start_server()).unwrap();

    let bg = source.load_background(BackgroundVariant::Spokesperson).unwrap();
    assert_eq!((bg.width(), bg.height()), (12, 6));

    let flags = source.load_flags();
    assert!(!flags.is_fallback());
    assert_eq!(flags.flags()[0].emoji, "🇯🇵");
}

#[test]
fn not_found_is_unavailable() {
    let source = HttpAssetSource::new(&start_server()).unwrap();
    assert!(source.background_bytes(BackgroundVariant::Defense).is_err());
    assert!(source.load_background(BackgroundVariant::Defense).is_none());
}
