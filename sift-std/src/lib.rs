//! Sift Standard Predicates
//!
//! The predicates shipped with sift. Each provider here is compiled into
//! its own plugin library by a thin `cdylib` crate (`sift-size`,
//! `sift-name`), and can also be registered in-process.

pub mod size;
pub mod name;

pub use size::SizePlugin;
pub use name::NamePlugin;

use sift_plugin::PluginRegistry;
use sift_core::DescriptorError;

/// Register the standard predicates in-process
pub fn load_standard_predicates(registry: &mut PluginRegistry) -> Result<(), DescriptorError> {
    registry.register_builtin(SizePlugin)?;
    registry.register_builtin(NamePlugin)?;
    Ok(())
}
