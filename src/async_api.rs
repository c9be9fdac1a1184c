use crate::assets::{AssetSource, BackgroundImage, BackgroundVariant, FlagCatalog, Language};
use crate::rendering::raster::{FontSource, Rasterizer};
use crate::studio::Studio;
use crate::{export, Error, RenderConfig, Result};
use std::ops::Range;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

/// Assets fetched for one background selection.
pub struct LoadedAssets {
    pub variant: BackgroundVariant,
    pub background: Option<BackgroundImage>,
    pub flags: FlagCatalog,
}

/// Fetch the background and the flag list concurrently on the blocking pool.
///
/// Neither load can fail: a missing background yields `None` and a missing
/// flag list yields the fallback catalog.
pub async fn load_assets<S>(source: Arc<S>, variant: BackgroundVariant) -> LoadedAssets
where
    S: AssetSource + ?Sized + 'static,
{
    let bg_source = Arc::clone(&source);
    let background = tokio::task::spawn_blocking(move || bg_source.load_background(variant));
    let flags = tokio::task::spawn_blocking(move || source.load_flags());

    let (background, flags) = futures::join!(background, flags);
    LoadedAssets {
        variant,
        background: background.unwrap_or_else(|e| {
            log::warn!("Background load task failed: {}", e);
            None
        }),
        flags: flags.unwrap_or_else(|e| {
            log::warn!("Flag list load task failed: {}", e);
            FlagCatalog::fallback()
        }),
    }
}

enum Command {
    Configure(Box<RenderConfig>, oneshot::Sender<Result<()>>),
    GetConfig(oneshot::Sender<Result<RenderConfig>>),
    SetAssets(LoadedAssets, oneshot::Sender<Result<()>>),
    Highlight(Range<usize>, oneshot::Sender<Result<Option<usize>>>),
    RenderPng(oneshot::Sender<Result<Vec<u8>>>),
    ExportJpeg(oneshot::Sender<Result<Vec<u8>>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly poster studio backed by a dedicated worker thread.
///
/// The worker thread owns the `Studio` (and with it the font system and
/// glyph caches) and executes commands sent from async tasks one at a time,
/// so renders never overlap and each one sees a complete config.
#[derive(Clone)]
pub struct StudioHandle {
    cmd_tx: Sender<Command>,
}

impl StudioHandle {
    /// Spawn the worker thread and build the studio on it.
    pub async fn new(language: Language, fonts: FontSource) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            let mut studio = Studio::with_rasterizer(language, Rasterizer::from_source(fonts));
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Configure(config, resp) => {
                        studio.set_config(*config);
                        let _ = resp.send(Ok(()));
                    }
                    Command::GetConfig(resp) => {
                        let _ = resp.send(Ok(studio.config().clone()));
                    }
                    Command::SetAssets(assets, resp) => {
                        studio.set_loaded_background(assets.variant, assets.background);
                        studio.set_flags(assets.flags);
                        let _ = resp.send(Ok(()));
                    }
                    Command::Highlight(selection, resp) => {
                        let _ = resp.send(Ok(studio.highlight_selection(selection)));
                    }
                    Command::RenderPng(resp) => {
                        let res = studio.render().and_then(|frame| frame.to_png());
                        let _ = resp.send(res);
                    }
                    Command::ExportJpeg(resp) => {
                        let res = studio.render().and_then(|frame| export::encode_jpeg(&frame));
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
            log::debug!("studio worker exiting");
        });

        init_rx
            .await
            .map_err(|e| Error::WorkerStopped(format!("init canceled: {}", e)))??;
        Ok(Self { cmd_tx })
    }

    async fn request<T>(
        &self,
        what: &str,
        make: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .map_err(|_| Error::WorkerStopped(format!("{} not sent", what)))?;
        rx.await
            .map_err(|e| Error::WorkerStopped(format!("{} canceled: {}", what, e)))?
    }

    /// Replace the render config.
    pub async fn configure(&self, config: RenderConfig) -> Result<()> {
        self.request("configure", |tx| Command::Configure(Box::new(config), tx))
            .await
    }

    pub async fn config(&self) -> Result<RenderConfig> {
        self.request("config", Command::GetConfig).await
    }

    /// Load assets for `variant` from `source` and hand them to the studio,
    /// which switches to `variant` if it was showing another background.
    pub async fn load_assets<S>(&self, source: Arc<S>, variant: BackgroundVariant) -> Result<()>
    where
        S: AssetSource + ?Sized + 'static,
    {
        let assets = load_assets(source, variant).await;
        self.request("set assets", |tx| Command::SetAssets(assets, tx))
            .await
    }

    /// Wrap the selected chars in highlight markers; returns the new caret.
    pub async fn highlight(&self, selection: Range<usize>) -> Result<Option<usize>> {
        self.request("highlight", |tx| Command::Highlight(selection, tx))
            .await
    }

    /// Render the poster at full size as PNG bytes.
    pub async fn render_png(&self) -> Result<Vec<u8>> {
        self.request("render", Command::RenderPng).await
    }

    /// Render and encode the half-size JPEG export.
    pub async fn export_jpeg(&self) -> Result<Vec<u8>> {
        self.request("export", Command::ExportJpeg).await
    }

    /// Shut the worker down.
    pub async fn close(self) -> Result<()> {
        self.request("close", Command::Close).await
    }
}
