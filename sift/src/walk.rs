//! Directory traversal

use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Call `visit` for every regular file under `root`, following symlinks.
///
/// Entries that cannot be read or stat'ed are reported at debug level and
/// skipped. An error returned by `visit` stops the walk.
pub fn walk<F>(root: &Path, mut visit: F) -> io::Result<()>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("skipping: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() {
            visit(entry.path())?;
        }
    }
    Ok(())
}
