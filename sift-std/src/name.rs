//! File name predicates: ext, name-contains

use sift_core::{OptionMeta, PluginError, PluginMeta, Result, SelectedOption};
use sift_plugin::PredicateProvider;
use std::path::Path;

pub struct NamePlugin;

impl PredicateProvider for NamePlugin {
    fn meta(&self) -> PluginMeta {
        PluginMeta::new("name")
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_author("sift")
            .with_description("Match files by name")
            .with_option(OptionMeta::with_value("ext", "Files with extension E (case-insensitive)"))
            .with_option(OptionMeta::with_value("name-contains", "Files whose name contains S"))
    }

    fn evaluate(&self, path: &Path, option: &SelectedOption) -> Result<bool> {
        let value = option.require_value()?;
        match option.name() {
            "ext" => Ok(has_extension(path, value)),
            "name-contains" => Ok(path
                .file_name()
                .map_or(false, |n| n.to_string_lossy().contains(value))),
            other => Err(PluginError::unknown_option("name", other)),
        }
    }
}

/// Extension comparison; an empty `ext` matches files without one
fn has_extension(path: &Path, ext: &str) -> bool {
    let want = ext.strip_prefix('.').unwrap_or(ext);
    match path.extension() {
        Some(have) => !want.is_empty() && have.to_string_lossy().eq_ignore_ascii_case(want),
        None => want.is_empty(),
    }
}
