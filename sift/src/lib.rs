//! Sift - find files by plugin predicates
//!
//! Walks a directory tree and prints every regular file for which the
//! selected plugin options, combined with AND or OR and optionally
//! inverted, hold.

mod eval;
mod render;
mod walk;

pub use eval::Evaluator;
pub use render::Renderer;
pub use walk::walk;

pub use sift_core::{Combinator, Mode};
pub use sift_plugin::PluginRegistry;

use std::io::{self, Write};
use std::path::Path;
use tracing::error;

/// Counters for one traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Regular files evaluated
    pub visited: usize,
    /// Files printed
    pub matched: usize,
    /// Files skipped because a plugin failed on them
    pub failed: usize,
}

/// Main sift engine.
///
/// Owns the registry once option binding is done; from here on plugins and
/// their selected options are only read.
pub struct Sift {
    registry: PluginRegistry,
    mode: Mode,
}

impl Sift {
    pub fn new(registry: PluginRegistry, mode: Mode) -> Self {
        Self { registry, mode }
    }

    /// Walk `root` and write every matching path to `out`, one per line
    pub fn run<W: Write>(&self, root: &Path, out: &mut W) -> io::Result<RunStats> {
        let evaluator = Evaluator::new(self.mode);
        let mut stats = RunStats::default();

        walk(root, |path| {
            stats.visited += 1;
            match evaluator.evaluate(&self.registry, path) {
                Ok(true) => {
                    stats.matched += 1;
                    write_path(&mut *out, path)
                }
                Ok(false) => Ok(()),
                Err(e) => {
                    error!("{}: {}", path.display(), e);
                    stats.failed += 1;
                    Ok(())
                }
            }
        })?;

        Ok(stats)
    }
}

#[cfg(unix)]
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;
    out.write_all(path.as_os_str().as_bytes())?;
    out.write_all(b"\n")
}

#[cfg(not(unix))]
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "{}", path.display())
}
