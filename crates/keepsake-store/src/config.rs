use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Directory name created under the user's documents (or home) directory.
pub const DEFAULT_DIR_NAME: &str = "Keepsake";

/// File extension appended to every sanitized key.
pub const DEFAULT_EXTENSION: &str = "cache";

/// Environment variable overriding [`StoreConfig::root`].
pub const ROOT_ENV: &str = "KEEPSAKE_ROOT";

/// Environment variable overriding [`StoreConfig::extension`].
pub const EXTENSION_ENV: &str = "KEEPSAKE_EXTENSION";

/// Where a file-backed store keeps its snapshots.
///
/// Parsed from TOML with the same field names; missing fields take their
/// defaults.
///
/// ```toml
/// root = "/var/lib/myapp/keepsake"
/// extension = "bin"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl StoreConfig {
    /// Default configuration rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Replace the file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(input: &str) -> StoreResult<Self> {
        toml::from_str(input).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Apply `KEEPSAKE_ROOT` / `KEEPSAKE_EXTENSION` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(root) = lookup(ROOT_ENV).filter(|v| !v.is_empty()) {
            self.root = PathBuf::from(root);
        }
        if let Some(ext) = lookup(EXTENSION_ENV).filter(|v| !v.is_empty()) {
            self.extension = ext;
        }
        self
    }

    /// Storage location for an already-sanitized key.
    pub fn location_for(&self, sanitized_key: &str) -> PathBuf {
        if self.extension.is_empty() {
            self.root.join(sanitized_key)
        } else {
            self.root.join(format!("{sanitized_key}.{}", self.extension))
        }
    }
}

fn default_root() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
