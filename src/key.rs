//! The key domain of the list.
//!
//! Every level of the list is bounded by two permanent sentinel nodes which
//! conceptually hold `$-\infty$` and `$+\infty$`. Rather than reserving two
//! magic key values for them, the key domain is widened to a tagged union with
//! a total order in which the front sentinel compares less than every
//! admissible key and the rear sentinel greater. Comparisons during scans then
//! need no special-casing, and a sentinel can never collide with a real key.

use std::fmt;

// ////////////////////////////////////////////////////////////////////////////
// Key
// ////////////////////////////////////////////////////////////////////////////

/// A key as stored in a node: either one of the two sentinel bounds, or an
/// admissible value.
///
/// The derived ordering relies on the variant declaration order:
/// [`NegInf`][Key::NegInf] `<` [`Value`][Key::Value] `<`
/// [`PosInf`][Key::PosInf], with values ordered as usual among themselves.
///
/// # Examples
///
/// ```
/// use skiptower::Key;
///
/// assert!(Key::NegInf < Key::Value(i32::MIN));
/// assert!(Key::Value(i32::MAX) < Key::PosInf);
/// assert!(Key::Value(3) < Key::Value(7));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    /// The front sentinel bound, less than every admissible key.
    NegInf,
    /// An admissible key.
    Value(i32),
    /// The rear sentinel bound, greater than every admissible key.
    PosInf,
}

impl Key {
    /// Returns `true` if this is one of the two sentinel bounds.
    #[must_use]
    #[inline]
    pub const fn is_sentinel(self) -> bool {
        matches!(self, Key::NegInf | Key::PosInf)
    }
}

impl From<i32> for Key {
    #[inline]
    fn from(key: i32) -> Self {
        Key::Value(key)
    }
}

/// Sentinels render as the minimum and maximum representable values of the
/// admissible key domain, matching what a guard node holding `i32::MIN` or
/// `i32::MAX` would have printed.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Key::NegInf => write!(f, "{}", i32::MIN),
            Key::Value(key) => write!(f, "{key}"),
            Key::PosInf => write!(f, "{}", i32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::Key;

    #[test]
    fn total_order() {
        assert!(Key::NegInf < Key::Value(i32::MIN));
        assert!(Key::Value(i32::MAX) < Key::PosInf);
        assert!(Key::NegInf < Key::PosInf);
        assert_eq!(Key::Value(5), Key::Value(5));
        assert!(Key::Value(5) < Key::Value(6));
    }

    #[rstest]
    #[case(Key::NegInf, "-2147483648")]
    #[case(Key::Value(0), "0")]
    #[case(Key::Value(25), "25")]
    #[case(Key::Value(-3), "-3")]
    #[case(Key::PosInf, "2147483647")]
    fn display(#[case] key: Key, #[case] rendered: &str) {
        assert_eq!(key.to_string(), rendered);
    }

    #[test]
    fn sentinel_flag() {
        assert!(Key::NegInf.is_sentinel());
        assert!(Key::PosInf.is_sentinel());
        assert!(!Key::Value(0).is_sentinel());
    }
}
