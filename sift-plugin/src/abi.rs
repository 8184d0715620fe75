//! C ABI shared by the host and plugin libraries.
//!
//! A plugin library exports two symbols:
//!
//! ```c
//! const plugin_info_t *plugin_get_info(void);
//! int plugin_process_file(const char *path, const option_t *option);
//! ```
//!
//! `plugin_process_file` returns 1 for a match, 0 for no match and -1 when
//! it could not decide. The info pointer must stay valid for as long as the
//! library is loaded.
//!
//! Rust plugins do not write these by hand; [`export_plugin!`] generates
//! them from any [`PredicateProvider`].
//!
//! [`export_plugin!`]: crate::export_plugin

use crate::PredicateProvider;
use sift_core::{DescriptorError, OptionMeta, PluginError, PluginMeta, Result, SelectedOption};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::ptr;

pub const GET_INFO_SYMBOL: &[u8] = b"plugin_get_info\0";
pub const PROCESS_FILE_SYMBOL: &[u8] = b"plugin_process_file\0";

pub const VERDICT_NO_MATCH: c_int = 0;
pub const VERDICT_MATCH: c_int = 1;
pub const VERDICT_ERROR: c_int = -1;

/// `plugin_option_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawOption {
    pub name: *const c_char,
    pub description: *const c_char,
    pub has_arg: c_int,
}

/// `option_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawSelectedOption {
    pub opt: RawOption,
    pub value: *const c_char,
    pub is_set: c_int,
}

/// `plugin_info_t`
#[repr(C)]
#[derive(Debug)]
pub struct RawPluginInfo {
    pub plugin_name: *const c_char,
    pub plugin_version: *const c_char,
    pub plugin_author: *const c_char,
    pub plugin_description: *const c_char,
    pub supplied_opt_count: c_int,
    pub supplied_opts: *const RawOption,
}

pub type GetInfoFn = unsafe extern "C" fn() -> *const RawPluginInfo;
pub type ProcessFileFn =
    unsafe extern "C" fn(path: *const c_char, option: *const RawSelectedOption) -> c_int;

// ============ Host side ============

/// Copy a plugin's raw descriptor into an owned `PluginMeta`.
///
/// # Safety
/// `info` must be null or point to a `plugin_info_t` whose strings are
/// NUL-terminated and whose option array holds `supplied_opt_count` entries.
pub unsafe fn meta_from_raw(info: *const RawPluginInfo) -> std::result::Result<PluginMeta, DescriptorError> {
    let info = info.as_ref().ok_or(DescriptorError::NullInfo)?;

    let mut meta = PluginMeta::new(required_str(info.plugin_name, "plugin_name")?)
        .with_version(optional_str(info.plugin_version, "plugin_version")?)
        .with_author(optional_str(info.plugin_author, "plugin_author")?)
        .with_description(optional_str(info.plugin_description, "plugin_description")?);

    if info.supplied_opt_count < 0 {
        return Err(DescriptorError::InvalidOptionCount(info.supplied_opt_count.into()));
    }
    let count = info.supplied_opt_count as usize;
    if count > 0 {
        if info.supplied_opts.is_null() {
            return Err(DescriptorError::MissingField("supplied_opts".to_string()));
        }
        for raw in std::slice::from_raw_parts(info.supplied_opts, count) {
            meta.options.push(option_from_raw(raw)?);
        }
    }

    Ok(meta)
}

/// Call a plugin's `plugin_process_file` for one file and option.
///
/// # Safety
/// `process_file` must be a live entry point of a loaded plugin.
pub unsafe fn call_process_file(
    process_file: ProcessFileFn,
    path: &Path,
    option: &SelectedOption,
) -> Result<c_int> {
    let c_path = path_to_cstring(path).ok_or_else(|| {
        PluginError::Other(format!("path contains a NUL byte: {}", path.display()))
    })?;
    let name = to_cstring(option.name(), option.name())?;
    let description = to_cstring(&option.option.description, option.name())?;
    let value = option
        .value()
        .map(|v| to_cstring(v, option.name()))
        .transpose()?;

    let raw = RawSelectedOption {
        opt: RawOption {
            name: name.as_ptr(),
            description: description.as_ptr(),
            has_arg: option.option.takes_value as c_int,
        },
        value: value.as_ref().map_or(ptr::null(), |v| v.as_ptr()),
        is_set: option.is_set as c_int,
    };

    Ok(process_file(c_path.as_ptr(), &raw))
}

/// Map a raw verdict onto a boolean, rejecting anything but 0 and 1.
pub fn verdict_from_raw(raw: c_int, plugin: &str, option: &str) -> Result<bool> {
    match raw {
        VERDICT_MATCH => Ok(true),
        VERDICT_NO_MATCH => Ok(false),
        VERDICT_ERROR => Err(PluginError::Failed {
            plugin: plugin.to_string(),
            option: option.to_string(),
        }),
        value => Err(PluginError::NonBoolean {
            plugin: plugin.to_string(),
            option: option.to_string(),
            value,
        }),
    }
}

// ============ Plugin side ============

/// Everything a plugin library hands out through its entry points.
///
/// Built once per library by [`export_plugin!`](crate::export_plugin) and
/// kept in a static, so `info()` stays valid until the library is unloaded.
pub struct ExportedPlugin {
    provider: Box<dyn PredicateProvider>,
    info: RawPluginInfo,
    _options: Vec<RawOption>,
    _strings: Vec<CString>,
}

// The raw pointers only reference `_options` and `_strings`, which are never
// mutated after construction.
unsafe impl Send for ExportedPlugin {}
unsafe impl Sync for ExportedPlugin {}

impl ExportedPlugin {
    pub fn new(provider: Box<dyn PredicateProvider>) -> Self {
        let meta = provider.meta();
        let mut strings = Vec::new();
        let mut intern = |s: &str| {
            let c = sanitized_cstring(s);
            let p = c.as_ptr();
            strings.push(c);
            p
        };

        let options: Vec<RawOption> = meta
            .options
            .iter()
            .map(|o| RawOption {
                name: intern(&o.name),
                description: intern(&o.description),
                has_arg: o.takes_value as c_int,
            })
            .collect();

        let info = RawPluginInfo {
            plugin_name: intern(&meta.name),
            plugin_version: intern(&meta.version),
            plugin_author: intern(&meta.author),
            plugin_description: intern(&meta.description),
            supplied_opt_count: options.len() as c_int,
            supplied_opts: if options.is_empty() { ptr::null() } else { options.as_ptr() },
        };

        Self {
            provider,
            info,
            _options: options,
            _strings: strings,
        }
    }

    pub fn info(&self) -> *const RawPluginInfo {
        &self.info
    }

    /// Body of the exported `plugin_process_file`.
    ///
    /// # Safety
    /// `path` and `option` must be null or valid for reads, with
    /// NUL-terminated strings.
    pub unsafe fn process_file(&self, path: *const c_char, option: *const RawSelectedOption) -> c_int {
        let Some(path) = path_from_raw(path) else {
            return VERDICT_ERROR;
        };
        let Some(option) = option.as_ref().and_then(|o| selected_from_raw(o)) else {
            return VERDICT_ERROR;
        };

        let verdict = catch_unwind(AssertUnwindSafe(|| self.provider.evaluate(&path, &option)));
        match verdict {
            Ok(Ok(true)) => VERDICT_MATCH,
            Ok(Ok(false)) => VERDICT_NO_MATCH,
            Ok(Err(_)) | Err(_) => VERDICT_ERROR,
        }
    }
}

/// Export a [`PredicateProvider`] as a loadable plugin.
///
/// ```ignore
/// sift_plugin::export_plugin!(MyPlugin::new());
/// ```
///
/// Invoke it once, in a crate built as a `cdylib`.
#[macro_export]
macro_rules! export_plugin {
    ($provider:expr) => {
        fn __sift_exported_plugin() -> &'static $crate::abi::ExportedPlugin {
            static EXPORTED: ::std::sync::OnceLock<$crate::abi::ExportedPlugin> =
                ::std::sync::OnceLock::new();
            EXPORTED.get_or_init(|| $crate::abi::ExportedPlugin::new(::std::boxed::Box::new($provider)))
        }

        #[no_mangle]
        pub extern "C" fn plugin_get_info() -> *const $crate::abi::RawPluginInfo {
            __sift_exported_plugin().info()
        }

        /// # Safety
        /// Called by the sift host with valid, NUL-terminated arguments.
        #[no_mangle]
        pub unsafe extern "C" fn plugin_process_file(
            path: *const ::std::os::raw::c_char,
            option: *const $crate::abi::RawSelectedOption,
        ) -> ::std::os::raw::c_int {
            __sift_exported_plugin().process_file(path, option)
        }
    };
}

// ============ Helpers ============

unsafe fn required_str(p: *const c_char, field: &str) -> std::result::Result<String, DescriptorError> {
    if p.is_null() {
        return Err(DescriptorError::MissingField(field.to_string()));
    }
    CStr::from_ptr(p)
        .to_str()
        .map(str::to_string)
        .map_err(|_| DescriptorError::InvalidUtf8(field.to_string()))
}

unsafe fn optional_str(p: *const c_char, field: &str) -> std::result::Result<String, DescriptorError> {
    if p.is_null() {
        return Ok(String::new());
    }
    required_str(p, field)
}

unsafe fn option_from_raw(raw: &RawOption) -> std::result::Result<OptionMeta, DescriptorError> {
    Ok(OptionMeta {
        name: required_str(raw.name, "option name")?,
        description: optional_str(raw.description, "option description")?,
        takes_value: raw.has_arg != 0,
    })
}

unsafe fn selected_from_raw(raw: &RawSelectedOption) -> Option<SelectedOption> {
    let option = option_from_raw(&raw.opt).ok()?;
    let value = if raw.value.is_null() {
        None
    } else {
        Some(CStr::from_ptr(raw.value).to_str().ok()?.to_string())
    };
    Some(SelectedOption {
        option,
        value,
        is_set: raw.is_set != 0,
    })
}

fn to_cstring(s: &str, option: &str) -> Result<CString> {
    CString::new(s).map_err(|_| PluginError::invalid_value(option, s, "contains a NUL byte"))
}

fn sanitized_cstring(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}

#[cfg(unix)]
fn path_to_cstring(path: &Path) -> Option<CString> {
    use std::os::unix::ffi::OsStrExt;
    CString::new(path.as_os_str().as_bytes()).ok()
}

#[cfg(not(unix))]
fn path_to_cstring(path: &Path) -> Option<CString> {
    CString::new(path.to_string_lossy().into_owned()).ok()
}

#[cfg(unix)]
unsafe fn path_from_raw(p: *const c_char) -> Option<PathBuf> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    if p.is_null() {
        return None;
    }
    Some(PathBuf::from(OsStr::from_bytes(CStr::from_ptr(p).to_bytes())))
}

#[cfg(not(unix))]
unsafe fn path_from_raw(p: *const c_char) -> Option<PathBuf> {
    if p.is_null() {
        return None;
    }
    CStr::from_ptr(p).to_str().ok().map(PathBuf::from)
}
