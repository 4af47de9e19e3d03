//! Pairwise preference statements
//!
//! A statement relates two alternatives: either the first is strictly
//! preferred to the second, or the decision maker is indifferent between
//! them (an unordered pair).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alternative::alternative::Alternative;

/// Kind of a pairwise statement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatementKind {
    /// Strict preference
    Preference,
    /// Indifference
    Indifference,
}

impl StatementKind {
    /// Relation symbol used when rendering statements
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Preference => ">",
            Self::Indifference => "~",
        }
    }
}

/// A pairwise comparison between two alternatives
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum PreferenceStatement {
    /// `preferred` is strictly preferred to `not_preferred`
    Preference {
        preferred: Alternative,
        not_preferred: Alternative,
    },
    /// The decision maker is indifferent between `first` and `second`
    Indifference { first: Alternative, second: Alternative },
}

impl PreferenceStatement {
    /// Strict preference of `preferred` over `not_preferred`
    pub fn preference(preferred: Alternative, not_preferred: Alternative) -> Self {
        Self::Preference {
            preferred,
            not_preferred,
        }
    }

    /// Indifference between `first` and `second`
    pub fn indifference(first: Alternative, second: Alternative) -> Self {
        Self::Indifference { first, second }
    }

    /// Kind of this statement
    pub fn kind(&self) -> StatementKind {
        match self {
            Self::Preference { .. } => StatementKind::Preference,
            Self::Indifference { .. } => StatementKind::Indifference,
        }
    }

    /// First alternative (the preferred one for strict preferences)
    pub fn first(&self) -> &Alternative {
        match self {
            Self::Preference { preferred, .. } => preferred,
            Self::Indifference { first, .. } => first,
        }
    }

    /// Second alternative (the not-preferred one for strict preferences)
    pub fn second(&self) -> &Alternative {
        match self {
            Self::Preference { not_preferred, .. } => not_preferred,
            Self::Indifference { second, .. } => second,
        }
    }

    /// Whether this is a strict preference
    pub fn is_preference(&self) -> bool {
        matches!(self, Self::Preference { .. })
    }

    /// Whether the statement involves an alternative with the given name
    pub fn involves(&self, name: &str) -> bool {
        self.first().name() == name || self.second().name() == name
    }
}

/// Value equality: same kind and same alternatives. Indifference is symmetric.
impl PartialEq for PreferenceStatement {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Preference {
                    preferred: p1,
                    not_preferred: n1,
                },
                Self::Preference {
                    preferred: p2,
                    not_preferred: n2,
                },
            ) => p1 == p2 && n1 == n2,
            (
                Self::Indifference {
                    first: f1,
                    second: s1,
                },
                Self::Indifference {
                    first: f2,
                    second: s2,
                },
            ) => (f1 == f2 && s1 == s2) || (f1 == s2 && s1 == f2),
            _ => false,
        }
    }
}

impl fmt::Display for PreferenceStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC({} {} {})",
            self.first().name(),
            self.kind().symbol(),
            self.second().name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alt(name: &str, x: f64) -> Alternative {
        Alternative::new(name, vec![x, 1.0 - x])
    }

    #[test]
    fn test_preference_accessors() {
        let s = PreferenceStatement::preference(alt("A1", 0.1), alt("A2", 0.9));
        assert_eq!(s.kind(), StatementKind::Preference);
        assert_eq!(s.first().name(), "A1");
        assert_eq!(s.second().name(), "A2");
        assert!(s.is_preference());
        assert!(s.involves("A2"));
        assert!(!s.involves("A3"));
    }

    #[test]
    fn test_preference_is_ordered() {
        let a = PreferenceStatement::preference(alt("A1", 0.1), alt("A2", 0.9));
        let b = PreferenceStatement::preference(alt("A2", 0.9), alt("A1", 0.1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_indifference_is_symmetric() {
        let a = PreferenceStatement::indifference(alt("A1", 0.1), alt("A2", 0.9));
        let b = PreferenceStatement::indifference(alt("A2", 0.9), alt("A1", 0.1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_kinds_never_equal() {
        let a = PreferenceStatement::preference(alt("A1", 0.1), alt("A2", 0.9));
        let b = PreferenceStatement::indifference(alt("A1", 0.1), alt("A2", 0.9));
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let a = PreferenceStatement::preference(alt("A1", 0.1), alt("A2", 0.9));
        assert_eq!(a.to_string(), "PC(A1 > A2)");
        let b = PreferenceStatement::indifference(alt("A1", 0.1), alt("A2", 0.9));
        assert_eq!(b.to_string(), "PC(A1 ~ A2)");
    }
}
