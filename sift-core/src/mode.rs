//! Verdict combination mode

use serde::Serialize;

/// How per-option verdicts are folded into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    /// Starting value of the fold: `true` for AND, `false` for OR
    pub fn identity(self) -> bool {
        match self {
            Combinator::And => true,
            Combinator::Or => false,
        }
    }

    pub fn combine(self, acc: bool, verdict: bool) -> bool {
        match self {
            Combinator::And => acc && verdict,
            Combinator::Or => acc || verdict,
        }
    }
}

/// Combinator plus optional final inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Mode {
    pub combinator: Combinator,
    pub invert: bool,
}

impl Mode {
    pub fn new(combinator: Combinator, invert: bool) -> Self {
        Self { combinator, invert }
    }

    /// Apply the final inversion, if any
    pub fn finish(self, acc: bool) -> bool {
        acc != self.invert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities() {
        assert!(Combinator::And.identity());
        assert!(!Combinator::Or.identity());
        assert_eq!(Combinator::default(), Combinator::And);
    }

    #[test]
    fn test_combine_tables() {
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            assert_eq!(Combinator::And.combine(a, b), a && b);
            assert_eq!(Combinator::Or.combine(a, b), a || b);
        }
    }

    #[test]
    fn test_finish_inverts() {
        let plain = Mode::new(Combinator::And, false);
        let inverted = Mode::new(Combinator::And, true);
        assert!(plain.finish(true));
        assert!(!inverted.finish(true));
        assert!(inverted.finish(false));
    }
}
