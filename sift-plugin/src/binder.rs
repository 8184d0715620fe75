//! Command-line option binding

use crate::PluginRegistry;
use tracing::{debug, warn};

/// What binding made of the argument list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindOutcome {
    /// Number of options bound to a plugin
    pub bound: usize,
    /// Arguments neither bound nor consumed as a value, in order. Short
    /// flags such as `-N` land here for the caller to interpret.
    pub rest: Vec<String>,
    /// `--name` arguments no plugin claimed
    pub ignored: Vec<String>,
}

/// Binds `--name` arguments to plugin options
pub struct OptionBinder;

impl OptionBinder {
    /// Walk `args` and append a selected option to the first plugin, in
    /// registration order, offering each `--name`.
    ///
    /// A value is taken from `--name=value`, or from the following argument
    /// when the option takes one, whatever that argument looks like. `--`
    /// arguments naming no plugin option are ignored; everything else not
    /// consumed is handed back in `rest`.
    pub fn bind<S: AsRef<str>>(registry: &mut PluginRegistry, args: &[S]) -> BindOutcome {
        let mut outcome = BindOutcome::default();
        let mut args = args.iter().map(AsRef::as_ref);

        while let Some(token) = args.next() {
            let Some(body) = token.strip_prefix("--") else {
                outcome.rest.push(token.to_string());
                continue;
            };

            let (name, fused) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (body, None),
            };

            let Some((index, option)) = registry.find_option(name) else {
                debug!("ignoring unrecognized option {}", token);
                outcome.ignored.push(token.to_string());
                continue;
            };
            let option = option.clone();

            let value = match fused {
                Some(value) => Some(value),
                None if option.takes_value => match args.next() {
                    Some(value) => Some(value.to_string()),
                    None => {
                        warn!("option --{} expects a value", option.name);
                        None
                    }
                },
                None => None,
            };

            debug!(option = %option.name, value = ?value, "bound option");
            registry.select(index, option, value);
            outcome.bound += 1;
        }

        outcome
    }
}
