//! Configuration for engines and preprocessors.
//!
//! Plain serde data: every field has a default, so partial JSON documents are
//! accepted.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the angle-bracket include search path.
pub const INCLUDE_ENV: &str = "INCLUDE";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for a single engine instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sampling interval used by state watchers.
    pub poll_interval: Duration,

    /// Number of transitions kept in the history; zero disables it.
    pub history_limit: usize,

    /// Prefix for the worker thread's name.
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(5),
            history_limit: 0,
            thread_name: "fsm".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_history(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

/// Settings for a preprocessor and the include children it spawns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Directories searched, in order, for `#include <...>`.
    pub include_paths: Vec<PathBuf>,

    /// Nesting limit for includes.
    pub max_include_depth: usize,

    /// Settings applied to every engine the preprocessor creates.
    pub engine: EngineConfig,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            include_paths: Vec::new(),
            max_include_depth: 64,
            engine: EngineConfig::default(),
        }
    }
}

impl PreprocessorConfig {
    /// Default settings with the search path taken from `INCLUDE`.
    ///
    /// The variable is split with the platform's path-list separator.
    pub fn from_env() -> Self {
        let include_paths = std::env::var_os(INCLUDE_ENV)
            .map(|paths| {
                std::env::split_paths(&paths)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            include_paths,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }
}
