//! Declared gender and gender-preference types.

use serde::{Deserialize, Serialize};

/// A traveler's declared gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Who a trip owner is willing to travel with.
///
/// Stored on the trip, not the user, so the same person can post trips
/// with different preferences.
///
/// # Examples
///
/// ```
/// use ride_server::domain::{Gender, GenderPreference};
///
/// assert!(GenderPreference::Any.admits(Gender::Male));
/// assert!(GenderPreference::Any.admits(Gender::Female));
/// assert!(GenderPreference::OnlyFemales.admits(Gender::Female));
/// assert!(!GenderPreference::OnlyFemales.admits(Gender::Male));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenderPreference {
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "only males")]
    OnlyMales,
    #[serde(rename = "only females")]
    OnlyFemales,
}

impl GenderPreference {
    /// Returns true if this preference admits a co-traveler of the
    /// given gender.
    pub fn admits(self, gender: Gender) -> bool {
        match self {
            GenderPreference::Any => true,
            GenderPreference::OnlyMales => gender == Gender::Male,
            GenderPreference::OnlyFemales => gender == Gender::Female,
        }
    }
}

impl Default for GenderPreference {
    fn default() -> Self {
        GenderPreference::Any
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_admits_both() {
        assert!(GenderPreference::Any.admits(Gender::Male));
        assert!(GenderPreference::Any.admits(Gender::Female));
    }

    #[test]
    fn only_males_admits_males_only() {
        assert!(GenderPreference::OnlyMales.admits(Gender::Male));
        assert!(!GenderPreference::OnlyMales.admits(Gender::Female));
    }

    #[test]
    fn only_females_admits_females_only() {
        assert!(GenderPreference::OnlyFemales.admits(Gender::Female));
        assert!(!GenderPreference::OnlyFemales.admits(Gender::Male));
    }

    #[test]
    fn serde_labels() {
        assert_eq!(
            serde_json::to_string(&GenderPreference::OnlyMales).unwrap(),
            "\"only males\""
        );
        assert_eq!(
            serde_json::from_str::<GenderPreference>("\"only females\"").unwrap(),
            GenderPreference::OnlyFemales
        );
        assert_eq!(
            serde_json::from_str::<Gender>("\"male\"").unwrap(),
            Gender::Male
        );
    }

    #[test]
    fn default_is_any() {
        assert_eq!(GenderPreference::default(), GenderPreference::Any);
    }
}
