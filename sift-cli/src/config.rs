//! Environment configuration

use sift_plugin::DEFAULT_CAPACITY;
use std::env;
use std::path::PathBuf;

pub const PLUGINS_DIR_ENV: &str = "SIFT_PLUGINS_DIR";
pub const DEBUG_ENV: &str = "SIFT_DEBUG";
pub const MAX_PLUGINS_ENV: &str = "SIFT_MAX_PLUGINS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Plugin directory used when `-P` is not given
    pub plugin_dir: PathBuf,
    /// Debug diagnostics, including traversal errors
    pub debug: bool,
    pub max_plugins: usize,
    /// Problems found while reading the environment, logged once logging is up
    pub warnings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let plugin_dir = lookup(PLUGINS_DIR_ENV)
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let max_plugins = match lookup(MAX_PLUGINS_ENV) {
            None => DEFAULT_CAPACITY,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warnings.push(format!(
                        "ignoring {}={:?}: expected a positive integer, using {}",
                        MAX_PLUGINS_ENV, raw, DEFAULT_CAPACITY
                    ));
                    DEFAULT_CAPACITY
                }
            },
        };

        Self {
            plugin_dir,
            debug: lookup(DEBUG_ENV).is_some(),
            max_plugins,
            warnings,
        }
    }

    /// Log filter when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "warn"
        }
    }
}
