//! Core flag scanning
//!
//! Plugin options are bound first, over the raw argument list, so an option
//! taking a value keeps its next argument even when that looks like `-N`.
//! Core flags and positionals are then read from what the binder left.
//! The one exception is `-P`, which has to be known before any plugin is
//! loaded; see [`parse`].

use sift_core::Combinator;
use sift_plugin::{OptionBinder, PluginRegistry};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Run,
    Help,
    Version,
    ListPlugins,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub plugin_dir: Option<PathBuf>,
    pub combinator: Combinator,
    pub invert: bool,
    pub action: Action,
    /// Non-flag arguments; the first is the search root
    pub positionals: Vec<String>,
}

/// Scan core flags. The first of `-v`, `-h` and `-L` decides the action;
/// later `-A`/`-O` override earlier ones. Unknown short flags are ignored.
///
/// Run over the raw arguments this is only good for `-P`, since it cannot
/// tell a plugin option's value from a flag.
pub fn parse<I, S>(args: I) -> Args
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        match arg {
            "-P" => match args.next() {
                Some(dir) => parsed.plugin_dir = Some(PathBuf::from(dir.as_ref())),
                None => warn!("-P expects a directory"),
            },
            "-A" => parsed.combinator = Combinator::And,
            "-O" => parsed.combinator = Combinator::Or,
            "-N" => parsed.invert = true,
            "-v" => act(&mut parsed, Action::Version),
            "-h" => act(&mut parsed, Action::Help),
            "-L" => act(&mut parsed, Action::ListPlugins),
            flag if flag.len() > 1 && flag.starts_with('-') => {
                debug!("ignoring unrecognized flag {}", flag);
            }
            _ => parsed.positionals.push(arg.to_string()),
        }
    }

    parsed
}

/// Bind plugin options in `registry`, then scan the remaining arguments
pub fn bind(registry: &mut PluginRegistry, args: &[String]) -> Args {
    let outcome = OptionBinder::bind(registry, args);
    debug!(bound = outcome.bound, ignored = ?outcome.ignored, "plugin options bound");
    parse(&outcome.rest)
}

fn act(parsed: &mut Args, action: Action) {
    if parsed.action == Action::Run {
        parsed.action = action;
    }
}
