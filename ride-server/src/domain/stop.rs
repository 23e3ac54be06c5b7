//! Stop name type.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Error returned when parsing an invalid stop name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop name: {reason}")]
pub struct InvalidStop {
    reason: &'static str,
}

/// A free-text stop name (city or station), compared case-insensitively.
///
/// Matching between trips is by exact stop-name equality ignoring case,
/// so `Stop` implements `PartialEq` and `Hash` over the lowercased form
/// while `Display` preserves the spelling the user entered.
///
/// # Examples
///
/// ```
/// use ride_server::domain::Stop;
///
/// let a = Stop::parse("Delhi").unwrap();
/// let b = Stop::parse("DELHI").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "Delhi");
///
/// // Blank names are rejected
/// assert!(Stop::parse("   ").is_err());
/// ```
#[derive(Clone)]
pub struct Stop(String);

impl Stop {
    /// Parse a stop name from a string.
    ///
    /// Surrounding whitespace is trimmed; the result must be non-empty.
    pub fn parse(s: &str) -> Result<Self, InvalidStop> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidStop {
                reason: "must not be empty",
            });
        }
        Ok(Stop(trimmed.to_string()))
    }

    /// Returns the stop name as entered (original casing).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn lowered(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().flat_map(char::to_lowercase)
    }
}

impl PartialEq for Stop {
    fn eq(&self, other: &Self) -> bool {
        self.lowered().eq(other.lowered())
    }
}

impl Eq for Stop {}

impl Hash for Stop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.lowered() {
            c.hash(state);
        }
    }
}

impl fmt::Debug for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stop({})", self.0)
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert!(Stop::parse("Delhi").is_ok());
        assert!(Stop::parse("New Delhi Railway Station").is_ok());
        assert!(Stop::parse("  Jaipur ").is_ok());
    }

    #[test]
    fn parse_trims_whitespace() {
        let stop = Stop::parse("  Jaipur ").unwrap();
        assert_eq!(stop.as_str(), "Jaipur");
    }

    #[test]
    fn reject_empty() {
        assert!(Stop::parse("").is_err());
        assert!(Stop::parse("   ").is_err());
        assert!(Stop::parse("\t\n").is_err());
    }

    #[test]
    fn equality_ignores_case() {
        let a = Stop::parse("Delhi").unwrap();
        let b = Stop::parse("delhi").unwrap();
        let c = Stop::parse("DELHI").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn inequality_for_different_names() {
        let a = Stop::parse("Delhi").unwrap();
        let b = Stop::parse("Jaipur").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn display_preserves_casing() {
        let stop = Stop::parse("New Delhi").unwrap();
        assert_eq!(stop.to_string(), "New Delhi");
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Stop::parse("Delhi").unwrap());
        assert!(set.contains(&Stop::parse("DELHI").unwrap()));
        assert!(!set.contains(&Stop::parse("Jaipur").unwrap()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn nonblank() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z ]{0,30}[A-Za-z]".prop_map(|s| s)
    }

    proptest! {
        /// Case-insensitive equality is symmetric.
        #[test]
        fn equality_symmetric(s in nonblank()) {
            let lower = Stop::parse(&s.to_lowercase()).unwrap();
            let upper = Stop::parse(&s.to_uppercase()).unwrap();
            prop_assert_eq!(&lower, &upper);
            prop_assert_eq!(&upper, &lower);
        }

        /// Parsing preserves the trimmed input verbatim.
        #[test]
        fn parse_preserves_input(s in nonblank()) {
            let stop = Stop::parse(&s).unwrap();
            prop_assert_eq!(stop.as_str(), s.trim());
        }
    }
}
