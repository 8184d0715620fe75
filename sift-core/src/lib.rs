//! Sift Core - Fundamental types
//!
//! This crate provides the types shared by the host and by plugins:
//! - `PluginMeta` / `OptionMeta`: what a plugin offers
//! - `SelectedOption`: an option the user switched on, with its value
//! - `Combinator` / `Mode`: how verdicts are folded
//! - `PluginError` / `DescriptorError`: structured failures

mod meta;
mod mode;
mod error;

pub use meta::{OptionMeta, PluginMeta, SelectedOption};
pub use mode::{Combinator, Mode};
pub use error::{DescriptorError, PluginError, Result};

/// Prelude for plugin authors
pub mod prelude {
    pub use crate::{OptionMeta, PluginMeta, SelectedOption, PluginError, Result};
}
