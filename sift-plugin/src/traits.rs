//! Provider trait

use sift_core::{PluginMeta, Result, SelectedOption};
use std::path::Path;

/// A source of file predicates.
///
/// `meta` is called once, when the provider is registered. `evaluate` is
/// called once per visited file for every option the user selected from
/// this provider.
pub trait PredicateProvider: Send + Sync {
    fn meta(&self) -> PluginMeta;
    fn evaluate(&self, path: &Path, option: &SelectedOption) -> Result<bool>;
}
