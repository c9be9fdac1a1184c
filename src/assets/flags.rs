//! Flag catalog with a fixed fallback list

use serde::{Deserialize, Serialize};

use crate::{Error, FlagPair, Result};

pub const DEFAULT_LEFT_CODE: &str = "CN";
pub const DEFAULT_RIGHT_CODE: &str = "JP";

const FALLBACK_FLAGS: [(&str, &str, &str); 8] = [
    ("CN", "🇨🇳", "中国"),
    ("JP", "🇯🇵", "日本"),
    ("US", "🇺🇸", "アメリカ"),
    ("KR", "🇰🇷", "韓国"),
    ("RU", "🇷🇺", "ロシア"),
    ("GB", "🇬🇧", "イギリス"),
    ("FR", "🇫🇷", "フランス"),
    ("DE", "🇩🇪", "ドイツ"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub code: String,
    pub emoji: String,
    pub name: String,
}

impl Flag {
    /// Selector label, e.g. `日本 🇯🇵`.
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.emoji)
    }
}

/// The ordered list of selectable flags. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagCatalog {
    flags: Vec<Flag>,
    is_fallback: bool,
}

impl FlagCatalog {
    pub fn fallback() -> Self {
        let flags = FALLBACK_FLAGS
            .iter()
            .map(|(code, emoji, name)| Flag {
                code: code.to_string(),
                emoji: emoji.to_string(),
                name: name.to_string(),
            })
            .collect();
        Self { flags, is_fallback: true }
    }

    /// Parse a JSON array of `{code, emoji, name}` records.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let flags: Vec<Flag> = serde_json::from_slice(bytes)?;
        if flags.is_empty() {
            return Err(Error::AssetUnavailable("flag list is empty".into()));
        }
        Ok(Self { flags, is_fallback: false })
    }

    /// Parse a fetched flag list, substituting the fallback on any failure.
    pub fn from_fetch(fetched: Result<Vec<u8>>) -> Self {
        match fetched.and_then(|bytes| Self::from_json(&bytes)) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Failed to load flag list: {}", e);
                Self::fallback()
            }
        }
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }

    pub fn by_code(&self, code: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.code.eq_ignore_ascii_case(code.trim()))
    }

    /// Emoji for a code, or the first entry's emoji when the code is unknown
    /// (a selector without a matching option shows its first option).
    pub fn emoji_or_first(&self, code: &str) -> &str {
        self.by_code(code)
            .or_else(|| self.flags.first())
            .map(|f| f.emoji.as_str())
            .unwrap_or_default()
    }

    /// Pair built from two codes.
    pub fn pair(&self, left: &str, right: &str) -> FlagPair {
        FlagPair {
            left: self.emoji_or_first(left).to_string(),
            right: self.emoji_or_first(right).to_string(),
        }
    }

    /// The CN / JP default selection.
    pub fn default_pair(&self) -> FlagPair {
        self.pair(DEFAULT_LEFT_CODE, DEFAULT_RIGHT_CODE)
    }
}

impl Default for FlagCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}
