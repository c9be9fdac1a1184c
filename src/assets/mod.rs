//! Poster assets: background templates, the flag catalog and localised strings
//!
//! Assets come from an `AssetSource`. The core never fails on a missing
//! asset: an unavailable background renders as a solid fill and an
//! unavailable flag list is replaced by the built-in fallback.

pub mod background;
pub mod flags;
pub mod locale;

use std::path::{Path, PathBuf};

pub use background::{BackgroundImage, BackgroundVariant};
pub use flags::{Flag, FlagCatalog};
pub use locale::Language;

use crate::{Error, Result};

/// File name of the flag list next to the backgrounds.
pub const FLAG_LIST_FILE: &str = "flags.json";

/// Where raw asset bytes come from.
pub trait AssetSource: Send + Sync {
    fn background_bytes(&self, variant: BackgroundVariant) -> Result<Vec<u8>>;
    fn flag_list_bytes(&self) -> Result<Vec<u8>>;

    /// Decode the background for `variant`; `None` when it is unavailable.
    fn load_background(&self, variant: BackgroundVariant) -> Option<BackgroundImage> {
        match self.background_bytes(variant).and_then(|b| BackgroundImage::decode(&b)) {
            Ok(img) => {
                log::debug!("Loaded background {} ({}x{})", variant, img.width(), img.height());
                Some(img)
            }
            Err(e) => {
                log::warn!("Background {} unavailable, using solid fill: {}", variant, e);
                None
            }
        }
    }

    fn load_flags(&self) -> FlagCatalog {
        FlagCatalog::from_fetch(self.flag_list_bytes())
    }
}

/// Assets read from a directory holding `background*.png` and `flags.json`.
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        std::fs::read(&path).map_err(|e| Error::AssetUnavailable(format!("{}: {}", path.display(), e)))
    }
}

impl AssetSource for DirAssetSource {
    fn background_bytes(&self, variant: BackgroundVariant) -> Result<Vec<u8>> {
        self.read(variant.file_name())
    }

    fn flag_list_bytes(&self) -> Result<Vec<u8>> {
        self.read(FLAG_LIST_FILE)
    }
}

/// A source with nothing in it; every load takes its fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAssetSource;

impl NoopAssetSource {
    pub fn new() -> Self {
        NoopAssetSource
    }
}

impl AssetSource for NoopAssetSource {
    fn background_bytes(&self, variant: BackgroundVariant) -> Result<Vec<u8>> {
        Err(Error::AssetUnavailable(variant.file_name().to_string()))
    }

    fn flag_list_bytes(&self) -> Result<Vec<u8>> {
        Err(Error::AssetUnavailable(FLAG_LIST_FILE.to_string()))
    }
}
