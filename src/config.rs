//! Engine configuration file
//!
//! A small TOML file, every field optional:
//!
//! ```toml
//! depth = 5
//! threads = 4
//! oscillation_penalty = 32
//! oscillation_window = 4
//! cache_path = "scores.txt"
//! ```

use crate::error::ConfigError;
use crate::search::SearchParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub depth: u8,
    pub threads: usize,
    pub oscillation_penalty: i32,
    pub oscillation_window: usize,
    /// Score cache loaded before and dumped after a session
    pub cache_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let params = SearchParams::default();
        Self {
            depth: params.depth,
            threads: params.threads,
            oscillation_penalty: params.oscillation_penalty,
            oscillation_window: params.oscillation_window,
            cache_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams::new()
            .depth(self.depth)
            .threads(self.threads)
            .oscillation_penalty(self.oscillation_penalty)
            .oscillation_window(self.oscillation_window)
    }
}
