//! Plugin Registry

use crate::PredicateProvider;
use sift_core::{DescriptorError, OptionMeta, PluginMeta, Result, SelectedOption};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Registry capacity when none is configured
pub const DEFAULT_CAPACITY: usize = 64;

/// Where a registered plugin came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum PluginOrigin {
    /// Loaded from a dynamic library at this path
    Library(PathBuf),
    /// Registered in-process
    Builtin,
}

/// A registered plugin and the options selected from it
pub struct PluginHandle {
    meta: PluginMeta,
    origin: PluginOrigin,
    selected: Vec<SelectedOption>,
    provider: Box<dyn PredicateProvider>,
}

impl PluginHandle {
    pub fn meta(&self) -> &PluginMeta {
        &self.meta
    }

    pub fn origin(&self) -> &PluginOrigin {
        &self.origin
    }

    pub fn selected(&self) -> &[SelectedOption] {
        &self.selected
    }

    pub fn evaluate(&self, path: &Path, option: &SelectedOption) -> Result<bool> {
        self.provider.evaluate(path, option)
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("meta", &self.meta)
            .field("origin", &self.origin)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

/// Ordered set of plugins, in registration order
#[derive(Debug)]
pub struct PluginRegistry {
    handles: Vec<PluginHandle>,
    capacity: usize,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handles: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.handles.len() >= self.capacity
    }

    pub fn handles(&self) -> &[PluginHandle] {
        &self.handles
    }

    /// Register a provider.
    ///
    /// Returns the handle index, or `None` if the registry is at capacity
    /// and the provider was dropped. The descriptor is validated first; an
    /// option name already offered by an earlier plugin is accepted but can
    /// never be bound, and a warning says so.
    pub fn register(
        &mut self,
        provider: Box<dyn PredicateProvider>,
        origin: PluginOrigin,
    ) -> std::result::Result<Option<usize>, DescriptorError> {
        let meta = provider.meta();
        meta.validate()?;

        if self.is_full() {
            warn!(
                plugin = %meta.name,
                capacity = self.capacity,
                "plugin registry is full, dropping plugin"
            );
            return Ok(None);
        }

        for opt in &meta.options {
            if let Some((owner, _)) = self.find_option(&opt.name) {
                warn!(
                    "option --{} of plugin '{}' is shadowed by plugin '{}'",
                    opt.name, meta.name, self.handles[owner].meta.name
                );
            }
        }

        debug!(plugin = %meta.name, version = %meta.version, "registered plugin");
        self.handles.push(PluginHandle {
            meta,
            origin,
            selected: Vec::new(),
            provider,
        });
        Ok(Some(self.handles.len() - 1))
    }

    /// Register an in-process provider
    pub fn register_builtin<P: PredicateProvider + 'static>(
        &mut self,
        provider: P,
    ) -> std::result::Result<Option<usize>, DescriptorError> {
        self.register(Box::new(provider), PluginOrigin::Builtin)
    }

    /// First plugin, in registration order, offering an option named `name`
    pub fn find_option(&self, name: &str) -> Option<(usize, &OptionMeta)> {
        self.handles
            .iter()
            .enumerate()
            .find_map(|(i, h)| h.meta.option(name).map(|opt| (i, opt)))
    }

    /// Total number of selected options across all plugins
    pub fn selected_count(&self) -> usize {
        self.handles.iter().map(|h| h.selected.len()).sum()
    }

    pub(crate) fn select(&mut self, index: usize, option: OptionMeta, value: Option<String>) {
        self.handles[index]
            .selected
            .push(SelectedOption::new(option, value));
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
