//! Help, version and plugin listing text

use serde::Serialize;
use sift_core::PluginMeta;
use sift_plugin::{PluginOrigin, PluginRegistry};
use std::fmt::Write;

const CORE_OPTIONS: [(&str, &str); 7] = [
    ("-P <dir>", "Plugin directory (default: $SIFT_PLUGINS_DIR, else .)"),
    ("-A", "Combine plugin options with AND (default)"),
    ("-O", "Combine plugin options with OR"),
    ("-N", "Invert the combined result"),
    ("-L", "List loaded plugins as JSON"),
    ("-v", "Print version"),
    ("-h", "Show this help message"),
];

const COLUMN: usize = 24;

#[derive(Serialize)]
struct PluginListing<'a> {
    #[serde(flatten)]
    meta: &'a PluginMeta,
    origin: &'a PluginOrigin,
}

/// Text renderer for the command line
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn version(&self) -> String {
        format!("sift {}", env!("CARGO_PKG_VERSION"))
    }

    /// Usage, core flags, then every loaded plugin's options
    pub fn help(&self, program: &str, registry: &PluginRegistry) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Usage: {} [options] [directory]", program);
        let _ = writeln!(out, "Options:");
        for (flag, description) in CORE_OPTIONS {
            option_line(&mut out, 2, flag, description);
        }

        out.push('\n');
        if registry.is_empty() {
            let _ = writeln!(out, "No plugins loaded.");
            return out;
        }

        let _ = writeln!(out, "Plugin options:");
        for handle in registry.handles() {
            let meta = handle.meta();
            let _ = write!(out, "  {}", meta.name);
            if !meta.version.is_empty() {
                let _ = write!(out, " {}", meta.version);
            }
            if !meta.author.is_empty() {
                let _ = write!(out, " ({})", meta.author);
            }
            if !meta.description.is_empty() {
                let _ = write!(out, ": {}", meta.description);
            }
            out.push('\n');

            for opt in &meta.options {
                let flag = if opt.takes_value {
                    format!("--{} <value>", opt.name)
                } else {
                    format!("--{}", opt.name)
                };
                option_line(&mut out, 4, &flag, &opt.description);
            }
        }
        out
    }

    /// Loaded plugin descriptors as a pretty JSON array
    pub fn plugins_json(&self, registry: &PluginRegistry) -> serde_json::Result<String> {
        let listing: Vec<PluginListing> = registry
            .handles()
            .iter()
            .map(|h| PluginListing {
                meta: h.meta(),
                origin: h.origin(),
            })
            .collect();
        serde_json::to_string_pretty(&listing)
    }
}

/// One `flag  description` row, aligned on [`COLUMN`]. A flag too wide for
/// the column gets the description on its own line.
fn option_line(out: &mut String, indent: usize, flag: &str, description: &str) {
    let width = COLUMN.saturating_sub(indent);
    if flag.len() < width {
        let _ = writeln!(out, "{:indent$}{:<width$}{}", "", flag, description);
    } else {
        let _ = writeln!(out, "{:indent$}{}", "", flag);
        let _ = writeln!(out, "{:column$}{}", "", description, column = COLUMN);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
