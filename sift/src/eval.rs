//! Verdict evaluator
//!
//! Folds the verdicts of every selected option for one file.

use sift_core::{Mode, Result};
use sift_plugin::PluginRegistry;
use std::path::Path;

/// Per-file evaluator
pub struct Evaluator {
    mode: Mode,
}

impl Evaluator {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Combine the verdicts of all selected options for `path`.
    ///
    /// Options are visited in registry order, then selection order, and
    /// every one is asked: there is no short-circuit. With nothing selected
    /// the result is the combinator's identity, so AND matches every file
    /// and OR matches none. The first plugin error aborts the file.
    pub fn evaluate(&self, registry: &PluginRegistry, path: &Path) -> Result<bool> {
        let combinator = self.mode.combinator;
        let mut acc = combinator.identity();

        for handle in registry.handles() {
            for option in handle.selected() {
                let verdict = handle.evaluate(path, option)?;
                acc = combinator.combine(acc, verdict);
            }
        }

        Ok(self.mode.finish(acc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::{Combinator, OptionMeta, PluginError, PluginMeta, SelectedOption};
    use sift_plugin::{OptionBinder, PredicateProvider};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Matches files whose name is in the comma-separated option value
    struct Listed {
        name: &'static str,
        option: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl Listed {
        fn new(name: &'static str, option: &'static str) -> Self {
            Self { name, option, calls: Arc::new(AtomicUsize::new(0)) }
        }
    }

    impl PredicateProvider for Listed {
        fn meta(&self) -> PluginMeta {
            PluginMeta::new(self.name).with_option(OptionMeta::with_value(self.option, "listed names"))
        }

        fn evaluate(&self, path: &Path, option: &SelectedOption) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let file = path.file_name().unwrap().to_string_lossy();
            Ok(option.require_value()?.split(',').any(|n| n == file))
        }
    }

    struct Broken;

    impl PredicateProvider for Broken {
        fn meta(&self) -> PluginMeta {
            PluginMeta::new("broken").with_option(OptionMeta::flag("broken", "always fails"))
        }

        fn evaluate(&self, _path: &Path, _option: &SelectedOption) -> Result<bool> {
            Err(PluginError::NonBoolean {
                plugin: "broken".into(),
                option: "broken".into(),
                value: 2,
            })
        }
    }

    fn registry(args: &[&str]) -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register_builtin(Listed::new("p", "p")).unwrap();
        registry.register_builtin(Listed::new("q", "q")).unwrap();
        OptionBinder::bind(&mut registry, args);
        registry
    }

    fn eval(registry: &PluginRegistry, combinator: Combinator, invert: bool, file: &str) -> bool {
        Evaluator::new(Mode::new(combinator, invert))
            .evaluate(registry, &Path::new("/t").join(file))
            .unwrap()
    }

    const FILES: [&str; 4] = ["a", "b", "c", "d"];

    #[test]
    fn test_no_selection_and_matches_all_or_matches_none() {
        let registry = registry(&[]);
        for file in FILES {
            assert!(eval(&registry, Combinator::And, false, file));
            assert!(!eval(&registry, Combinator::Or, false, file));
        }
    }

    #[test]
    fn test_and_or() {
        let registry = registry(&["--p", "a,b", "--q", "b,c"]);
        let and: Vec<bool> = FILES.iter().map(|f| eval(&registry, Combinator::And, false, f)).collect();
        let or: Vec<bool> = FILES.iter().map(|f| eval(&registry, Combinator::Or, false, f)).collect();
        assert_eq!(and, [false, true, false, false]);
        assert_eq!(or, [true, true, true, false]);
    }

    #[test]
    fn test_not_is_an_involution() {
        let registry = registry(&["--p", "a,b", "--q", "b,c"]);
        for combinator in [Combinator::And, Combinator::Or] {
            for file in FILES {
                let plain = eval(&registry, combinator, false, file);
                let inverted = eval(&registry, combinator, true, file);
                assert_eq!(inverted, !plain);
                assert_eq!(Mode::new(combinator, true).finish(inverted), plain);
            }
        }
    }

    #[test]
    fn test_selection_order_does_not_matter() {
        let orders: [&[&str]; 3] = [
            &["--p", "a,b", "--q", "b,c", "--p", "b,d"],
            &["--q", "b,c", "--p", "b,d", "--p", "a,b"],
            &["--p", "b,d", "--q", "b,c", "--p", "a,b"],
        ];
        for combinator in [Combinator::And, Combinator::Or] {
            let verdicts: Vec<Vec<bool>> = orders
                .iter()
                .map(|args| {
                    let registry = registry(args);
                    FILES.iter().map(|f| eval(&registry, combinator, false, f)).collect()
                })
                .collect();
            assert!(verdicts.windows(2).all(|w| w[0] == w[1]), "{:?}", combinator);
        }
    }

    #[test]
    fn test_every_predicate_invoked() {
        let p = Listed::new("p", "p");
        let calls = p.calls.clone();
        let mut registry = PluginRegistry::new();
        registry.register_builtin(p).unwrap();
        OptionBinder::bind(&mut registry, &["--p", "x", "--p", "y", "--p", "z"]);

        // first verdict is already false, the rest are still asked
        assert!(!eval(&registry, Combinator::And, false, "a"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_plugin_error_aborts_file() {
        let mut registry = PluginRegistry::new();
        registry.register_builtin(Listed::new("p", "p")).unwrap();
        registry.register_builtin(Broken).unwrap();
        OptionBinder::bind(&mut registry, &["--p", "a", "--broken"]);

        let result = Evaluator::new(Mode::default()).evaluate(&registry, Path::new("/t/a"));
        assert!(matches!(result, Err(PluginError::NonBoolean { value: 2, .. })));
    }
}
