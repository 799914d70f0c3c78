//! Argument matchers: wildcard-or-exact patterns over a single argument.

use std::fmt;

/// Contract every interaction shape (Props) must satisfy.
///
/// A Props value is a tagged union with one case per mocked method, each
/// case carrying its arguments wrapped in [`Matcher`]s. Cases of different
/// kind never match; cases of the same kind match iff every positional
/// matcher matches.
///
/// The `Debug` supertrait supplies the description printed in failure
/// messages, so deriving `Debug` on the Props enum is all an interface
/// author needs to do for readable verification output.
pub trait Matcheable: fmt::Debug {
    /// Whether `self` and `other` describe the same interaction.
    fn matches(&self, other: &Self) -> bool;
}

/// A two-variant pattern over a single argument: accept anything, or
/// accept exactly this value.
///
/// Pattern instances (built by stub/expectation registration) typically mix
/// `Any` and `Exact`; recorded instances (built by the mock method itself)
/// always wrap `Exact` of the argument actually passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher<T> {
    /// Matches any value.
    Any,
    /// Matches only this value.
    Exact(T),
}

impl<T> Matcher<T> {
    /// True if this is the wildcard variant.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// The exact value, if this is the `Exact` variant.
    pub fn exact_value(&self) -> Option<&T> {
        match self {
            Self::Any => None,
            Self::Exact(value) => Some(value),
        }
    }
}

impl<T: PartialEq + fmt::Debug> Matcheable for Matcher<T> {
    /// Symmetric with respect to `Any`: either side being `Any` matches.
    /// `Exact` against `Exact` delegates to value equality.
    fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Any, _) | (_, Self::Any) => true,
            (Self::Exact(lhs), Self::Exact(rhs)) => lhs == rhs,
        }
    }
}

impl<T> From<T> for Matcher<T> {
    fn from(value: T) -> Self {
        Self::Exact(value)
    }
}

impl<T: fmt::Display> fmt::Display for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "_"),
            Self::Exact(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_any_matches_everything() {
        let any: Matcher<i32> = Matcher::Any;
        assert!(any.matches(&Matcher::Exact(1)));
        assert!(any.matches(&Matcher::Exact(-7)));
        assert!(any.matches(&Matcher::Any));
    }

    #[test]
    fn test_exact_matches_equal_values_only() {
        let exact = Matcher::Exact("a".to_string());
        assert!(exact.matches(&Matcher::Exact("a".to_string())));
        assert!(!exact.matches(&Matcher::Exact("b".to_string())));
    }

    #[test]
    fn test_any_is_symmetric() {
        let exact = Matcher::Exact(42_u32);
        assert!(exact.matches(&Matcher::Any));
        assert!(Matcher::Any.matches(&exact));
    }

    #[test]
    fn test_from_wraps_exact() {
        let matcher: Matcher<u8> = 5.into();
        assert_eq!(matcher, Matcher::Exact(5));
        assert_eq!(matcher.exact_value(), Some(&5));
        assert!(!matcher.is_any());
    }

    #[test]
    fn test_display_renders_wildcard_and_value() {
        assert_eq!(Matcher::<i32>::Any.to_string(), "_");
        assert_eq!(Matcher::Exact(9).to_string(), "9");
    }

    proptest! {
        #[test]
        fn prop_matches_is_symmetric(a in any::<Option<i64>>(), b in any::<Option<i64>>()) {
            let lhs = a.map_or(Matcher::Any, Matcher::Exact);
            let rhs = b.map_or(Matcher::Any, Matcher::Exact);
            prop_assert_eq!(lhs.matches(&rhs), rhs.matches(&lhs));
        }

        #[test]
        fn prop_exact_matches_iff_equal(a in any::<i64>(), b in any::<i64>()) {
            let lhs = Matcher::Exact(a);
            let rhs = Matcher::Exact(b);
            prop_assert_eq!(lhs.matches(&rhs), a == b);
        }
    }
}
