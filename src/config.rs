//! Settings shared by `ofdoc-index` and `ofdoc-open`.
//!
//! Values come from an optional TOML file; command-line flags override them.
//!
//! ```toml
//! docs_root = "/home/me/ofSite/_documentation"
//! index_dir = "/home/me/.ofdoc/index"
//! converter = "pandoc"
//! base_url = "http://www.openframeworks.cc/documentation/"
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://www.openframeworks.cc/documentation/";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the markup sources (`ofSite/_documentation`).
    pub docs_root: Option<PathBuf>,
    /// Directory holding the index files and the converted HTML.
    pub index_dir: PathBuf,
    /// Converter executable.
    pub converter: PathBuf,
    /// Extension of the source documents, without the dot.
    pub source_extension: String,
    /// Prefix of every documentation URL.
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_root: None,
            index_dir: PathBuf::from("index"),
            converter: PathBuf::from("pandoc"),
            source_extension: "markdown".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let mut config: Config = toml::from_str(text).map_err(|e| Error::Config {
            path: origin.to_path_buf(),
            message: e.message().to_string(),
        })?;
        config.base_url = normalize_base_url(&config.base_url);
        config.source_extension = config.source_extension.trim_start_matches('.').to_string();
        Ok(config)
    }
}

/// Base URLs are used as plain prefixes, so they must end with a slash.
pub fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
