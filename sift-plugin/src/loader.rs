//! Dynamic plugin loader.
//!
//! Scans one directory for dynamic libraries and registers every library
//! exporting the sift entry points. Libraries are opened with immediate
//! symbol binding, so a plugin with unresolved references fails to load
//! instead of failing later mid-walk.

use std::env::consts::DLL_SUFFIX;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use libloading::Library;
use sift_core::{DescriptorError, PluginMeta, Result, SelectedOption};
use thiserror::Error;
use tracing::{debug, warn};

use crate::abi::{self, GetInfoFn, ProcessFileFn};
use crate::{PluginOrigin, PluginRegistry, PredicateProvider};

/// Plugin loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open plugin directory {}: {source}", path.display())]
    Directory { path: PathBuf, source: io::Error },

    #[error("failed to load plugin {}: {source}", path.display())]
    Library { path: PathBuf, source: libloading::Error },

    #[error("invalid plugin interface in {}: missing {symbol}", path.display())]
    MissingEntryPoint { path: PathBuf, symbol: &'static str },

    #[error("invalid plugin descriptor in {}: {source}", path.display())]
    Descriptor { path: PathBuf, source: DescriptorError },
}

/// Outcome of scanning a plugin directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries whose name looked like a dynamic library
    pub candidates: usize,
    /// Plugins registered
    pub loaded: usize,
    /// Candidates rejected with a diagnostic
    pub skipped: usize,
    /// Valid plugins left out because the registry was full
    pub dropped: usize,
}

/// A plugin living in a loaded dynamic library
pub struct DynamicProvider {
    meta: PluginMeta,
    process_file: ProcessFileFn,
    path: PathBuf,
    // Dropped last: `process_file` points into it.
    _library: Library,
}

impl DynamicProvider {
    /// Open a plugin library and read its descriptor.
    ///
    /// The library is unloaded again if either entry point is missing or
    /// the descriptor cannot be read.
    pub fn open(path: &Path) -> std::result::Result<Self, LoadError> {
        let library = open_library(path).map_err(|source| LoadError::Library {
            path: path.to_path_buf(),
            source,
        })?;

        let entry_points = unsafe {
            let get_info = library.get::<GetInfoFn>(abi::GET_INFO_SYMBOL).map(|s| *s);
            let process_file = library.get::<ProcessFileFn>(abi::PROCESS_FILE_SYMBOL).map(|s| *s);
            (get_info, process_file)
        };

        let (get_info, process_file) = match entry_points {
            (Ok(get_info), Ok(process_file)) => (get_info, process_file),
            (get_info, _) => {
                let symbol = if get_info.is_err() {
                    "plugin_get_info"
                } else {
                    "plugin_process_file"
                };
                if let Err(e) = library.close() {
                    warn!("failed to unload {}: {}", path.display(), e);
                }
                return Err(LoadError::MissingEntryPoint {
                    path: path.to_path_buf(),
                    symbol,
                });
            }
        };

        let meta = unsafe { abi::meta_from_raw(get_info()) }.map_err(|source| LoadError::Descriptor {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            meta,
            process_file,
            path: path.to_path_buf(),
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PredicateProvider for DynamicProvider {
    fn meta(&self) -> PluginMeta {
        self.meta.clone()
    }

    fn evaluate(&self, path: &Path, option: &SelectedOption) -> Result<bool> {
        let raw = unsafe { abi::call_process_file(self.process_file, path, option)? };
        abi::verdict_from_raw(raw, &self.meta.name, option.name())
    }
}

/// Load every plugin library found directly inside `dir` into `registry`.
///
/// Only an unreadable directory is an error. Candidates that fail to load,
/// lack an entry point or carry a bad descriptor are reported and skipped.
/// Registration order follows directory enumeration order.
pub fn load_plugins(dir: &Path, registry: &mut PluginRegistry) -> std::result::Result<LoadReport, LoadError> {
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut report = LoadReport::default();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("failed to read entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !is_plugin_candidate(&path) {
            continue;
        }
        report.candidates += 1;

        let provider = match DynamicProvider::open(&path) {
            Ok(provider) => provider,
            Err(e) => {
                warn!("{}", e);
                report.skipped += 1;
                continue;
            }
        };

        match registry.register(Box::new(provider), PluginOrigin::Library(path.clone())) {
            Ok(Some(_)) => {
                debug!("loaded plugin {}", path.display());
                report.loaded += 1;
            }
            Ok(None) => report.dropped += 1,
            Err(source) => {
                warn!("{}", LoadError::Descriptor { path, source });
                report.skipped += 1;
            }
        }
    }

    debug!(?report, "plugin directory {} scanned", dir.display());
    Ok(report)
}

/// Whether a directory entry should be tried as a plugin library
pub fn is_plugin_candidate(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.contains(DLL_SUFFIX))
}

#[cfg(unix)]
fn open_library(path: &Path) -> std::result::Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_LOCAL, RTLD_NOW};
    unsafe { UnixLibrary::open(Some(path), RTLD_NOW | RTLD_LOCAL) }.map(Library::from)
}

#[cfg(not(unix))]
fn open_library(path: &Path) -> std::result::Result<Library, libloading::Error> {
    unsafe { Library::new(path) }
}
