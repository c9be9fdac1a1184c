//! HTTP asset source: backgrounds and the flag list served next to each other
//! under one base URL.

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::assets::{AssetSource, BackgroundVariant, FLAG_LIST_FILE};
use crate::{Error, Result};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const USER_AGENT: &str = concat!("rfplacard/", env!("CARGO_PKG_VERSION"));

/// Fetches assets relative to `base` with a blocking client.
///
/// Use it from a blocking context (`async_api::load_assets` runs it on the
/// blocking pool).
#[derive(Debug, Clone)]
pub struct HttpAssetSource {
    base: Url,
    client: Client,
}

impl HttpAssetSource {
    pub fn new(base: &str) -> Result<Self> {
        Self::with_timeout(base, Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn with_timeout(base: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base)
            .map_err(|e| Error::ConfigError(format!("Invalid asset base URL {}: {}", base, e)))?;
        // join() replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let url = self
            .base
            .join(name)
            .map_err(|e| Error::ConfigError(format!("Invalid asset name {}: {}", name, e)))?;
        log::debug!("GET {}", url);
        let res = self
            .client
            .get(url.clone())
            .header("User-Agent", USER_AGENT)
            .send()?;
        if !res.status().is_success() {
            return Err(Error::AssetUnavailable(format!("{} returned {}", url, res.status())));
        }
        Ok(res.bytes()?.to_vec())
    }
}

impl AssetSource for HttpAssetSource {
    fn background_bytes(&self, variant: BackgroundVariant) -> Result<Vec<u8>> {
        self.fetch(variant.file_name())
    }

    fn flag_list_bytes(&self) -> Result<Vec<u8>> {
        self.fetch(FLAG_LIST_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_gets_trailing_slash() {
        let src = HttpAssetSource::new("http://127.0.0.1:9/assets").unwrap();
        assert_eq!(src.base().as_str(), "http://127.0.0.1:9/assets/");
        assert_eq!(src.base().join("flags.json").unwrap().path(), "/assets/flags.json");
    }

    #[test]
    fn invalid_base_is_config_error() {
        assert!(matches!(HttpAssetSource::new("not a url"), Err(Error::ConfigError(_))));
    }
}
