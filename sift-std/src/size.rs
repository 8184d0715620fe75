//! File size predicates: min-size, max-size

use sift_core::{OptionMeta, PluginError, PluginMeta, Result, SelectedOption};
use sift_plugin::PredicateProvider;
use std::fs;
use std::path::Path;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

pub struct SizePlugin;

impl PredicateProvider for SizePlugin {
    fn meta(&self) -> PluginMeta {
        PluginMeta::new("size")
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_author("sift")
            .with_description("Match files by size in bytes (K, M, G suffixes accepted)")
            .with_option(OptionMeta::with_value("min-size", "Files of at least N bytes"))
            .with_option(OptionMeta::with_value("max-size", "Files of at most N bytes"))
    }

    fn evaluate(&self, path: &Path, option: &SelectedOption) -> Result<bool> {
        let raw = option.require_value()?;
        let limit = parse_size(raw).ok_or_else(|| {
            PluginError::invalid_value(option.name(), raw, "expected a byte count like 100, 4K or 2MB")
        })?;

        let len = fs::metadata(path)
            .map_err(|e| PluginError::Other(format!("cannot stat {}: {}", path.display(), e)))?
            .len();

        match option.name() {
            "min-size" => Ok(len >= limit),
            "max-size" => Ok(len <= limit),
            other => Err(PluginError::unknown_option("size", other)),
        }
    }
}

/// Parse a byte count with an optional binary suffix: `100`, `4K`, `2MB`, `1g`
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim();
    let upper = s.to_ascii_uppercase();
    let body = upper.strip_suffix('B').unwrap_or(&upper);

    let (digits, unit) = match body.chars().last()? {
        'K' => (&body[..body.len() - 1], KB),
        'M' => (&body[..body.len() - 1], MB),
        'G' => (&body[..body.len() - 1], GB),
        _ => (body, 1),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()?.checked_mul(unit)
}
