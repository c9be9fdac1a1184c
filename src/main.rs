use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rfplacard::assets::{AssetSource, DirAssetSource, NoopAssetSource};
use rfplacard::async_api::load_assets;
use rfplacard::rendering::raster::{FontSource, Rasterizer};
use rfplacard::studio::Studio;
use rfplacard::{export, BackgroundVariant, FontFamily, Language, QuoteMode, RenderConfig};

/// rfplacard: render spokesperson-style quote posters
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a poster and save it
    Render(RenderArgs),
    /// List the flags available from the asset source
    Flags(AssetArgs),
}

#[derive(clap::Args, Debug)]
struct AssetArgs {
    /// Directory holding background*.png and flags.json
    #[clap(short, long)]
    assets: Option<PathBuf>,

    /// Base URL serving the same files
    #[cfg(feature = "remote")]
    #[clap(long, conflicts_with = "assets")]
    assets_url: Option<String>,
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    #[clap(flatten)]
    assets: AssetArgs,

    /// Poster text; `[g]...[/g]` marks highlighted spans
    #[clap(short, long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read the poster text from a file
    #[clap(long)]
    text_file: Option<PathBuf>,

    /// JSON render config to start from
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Language for the sample text and footer (ja, en, ko, zh-Hans, zh-Hant)
    #[clap(short, long, default_value = "ja")]
    language: String,

    /// Background template (foreign-affairs, defense, spokesperson)
    #[clap(short, long)]
    background: Option<String>,

    /// Left and right flag codes
    #[clap(long)]
    flag1: Option<String>,
    #[clap(long)]
    flag2: Option<String>,

    #[clap(long)]
    font_family: Option<String>,
    #[clap(long)]
    font_size: Option<f32>,
    /// Wrap the text in quotation marks
    #[clap(long)]
    quote: bool,
    #[clap(long)]
    shadow_blur: Option<f32>,
    #[clap(long)]
    footer: Option<String>,

    /// Extra font directories
    #[clap(long)]
    font_dir: Vec<PathBuf>,

    /// Save the full-size PNG instead of the half-size JPEG
    #[clap(long)]
    png: bool,

    /// Output path (defaults to propaganda.jpg / propaganda.png)
    #[clap(short, long)]
    out: Option<PathBuf>,
}

impl AssetArgs {
    fn source(&self) -> anyhow::Result<Arc<dyn AssetSource>> {
        #[cfg(feature = "remote")]
        {
            if let Some(url) = &self.assets_url {
                return Ok(Arc::new(rfplacard::remote::HttpAssetSource::new(url)?));
            }
        }
        Ok(match &self.assets {
            Some(dir) => Arc::new(DirAssetSource::new(dir)),
            None => Arc::new(NoopAssetSource::new()),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Command::Render(render) => run_render(render).await,
        Command::Flags(assets) => run_flags(assets).await,
    }
}

async fn run_flags(args: AssetArgs) -> anyhow::Result<()> {
    let source = args.source()?;
    let catalog = tokio::task::spawn_blocking(move || source.load_flags()).await?;
    if catalog.is_fallback() {
        log::warn!("Flag list unavailable, showing built-in fallback");
    }
    for flag in catalog.flags() {
        println!("{}\t{}", flag.code, flag.label());
    }
    Ok(())
}

async fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let language: Language = args.language.parse()?;
    let fonts = if args.font_dir.is_empty() {
        FontSource::System
    } else {
        FontSource::Dirs(args.font_dir.clone())
    };
    let mut studio = Studio::with_rasterizer(language, Rasterizer::from_source(fonts));

    if let Some(path) = &args.config {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: RenderConfig = serde_json::from_str(&json)
            .with_context(|| format!("parsing config {}", path.display()))?;
        studio.set_config(config);
    }
    if let Some(bg) = &args.background {
        let variant: BackgroundVariant = bg.parse()?;
        studio.select_background(variant);
    }

    let source = args.assets.source()?;
    let assets = load_assets(source, studio.config().background).await;
    studio.set_loaded_background(assets.variant, assets.background);
    let default_flags = studio.config().flags.clone();
    studio.set_flags(assets.flags);
    if args.config.is_some() {
        studio.config_mut().flags = default_flags;
    }

    let text = match (&args.text, &args.text_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading text {}", path.display()))?,
        ),
        (None, None) => None,
    };
    if let Some(left) = &args.flag1 {
        let emoji = studio.flags().emoji_or_first(left).to_string();
        studio.config_mut().flags.left = emoji;
    }
    if let Some(right) = &args.flag2 {
        let emoji = studio.flags().emoji_or_first(right).to_string();
        studio.config_mut().flags.right = emoji;
    }

    let cfg = studio.config_mut();
    if let Some(text) = text {
        cfg.text = text;
    }
    if let Some(family) = &args.font_family {
        cfg.font_family = FontFamily::from_key(family);
    }
    if let Some(size) = args.font_size {
        if !size.is_finite() || size <= 0.0 {
            bail!("--font-size must be positive");
        }
        cfg.font_size = size;
    }
    if args.quote {
        cfg.quote_mode = QuoteMode::Both;
    }
    if let Some(blur) = args.shadow_blur {
        cfg.shadow_blur = blur.max(0.0);
    }
    if let Some(footer) = &args.footer {
        cfg.footer_text = footer.clone();
    }

    let frame = studio.render()?;
    log::info!("Rendered {}x{} poster", frame.width(), frame.height());

    if args.png {
        let out = args.out.unwrap_or_else(|| PathBuf::from("propaganda.png"));
        std::fs::write(&out, frame.to_png()?)
            .with_context(|| format!("writing {}", out.display()))?;
        println!("{}", out.display());
        return Ok(());
    }

    let out = args.out.unwrap_or_else(|| PathBuf::from(export::EXPORT_FILE_NAME));
    match export::save_as(&frame, out) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!("export abandoned"),
    }
}
