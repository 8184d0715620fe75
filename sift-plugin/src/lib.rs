//! Sift Plugin System
//!
//! Predicates come from plugins. A plugin is anything implementing
//! [`PredicateProvider`]; at runtime they are loaded from dynamic libraries
//! exporting the C entry points described in [`abi`].
//!
//! - [`loader`]: discovers and opens plugin libraries in a directory
//! - [`PluginRegistry`]: owns every loaded plugin, in discovery order
//! - [`OptionBinder`]: maps `--name` arguments onto plugin options

pub mod abi;
pub mod loader;
mod traits;
mod registry;
mod binder;

pub use traits::PredicateProvider;
pub use registry::{PluginHandle, PluginOrigin, PluginRegistry, DEFAULT_CAPACITY};
pub use binder::{BindOutcome, OptionBinder};
pub use loader::{load_plugins, DynamicProvider, LoadError, LoadReport};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::PredicateProvider;
    pub use sift_core::prelude::*;
}
