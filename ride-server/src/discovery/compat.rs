//! Compatibility evaluator.
//!
//! Pure decision functions with no side effects. Absent or malformed
//! input never errors; it simply yields `false` (fail closed).

use crate::domain::{Gender, GenderPreference, Segment};

/// Decide whether two segments represent the same journey segment.
///
/// True iff origins match, destinations match (both case-insensitive via
/// [`Stop`] equality), the calendar dates are equal, and the departures
/// are within `tolerance_mins` minutes of each other by minute-of-day.
///
/// Symmetric: `segments_match(a, b, t) == segments_match(b, a, t)`.
///
/// [`Stop`]: crate::domain::Stop
pub fn segments_match(a: &Segment, b: &Segment, tolerance_mins: i64) -> bool {
    a.origin() == b.origin()
        && a.destination() == b.destination()
        && a.departs().date() == b.departs().date()
        && minutes_apart(a, b) <= tolerance_mins
}

fn minutes_apart(a: &Segment, b: &Segment) -> i64 {
    (a.departs().minute_of_day() as i64 - b.departs().minute_of_day() as i64).abs()
}

/// Decide whether two travelers mutually accept each other.
///
/// Each side's preference must admit the other side's declared gender
/// (symmetric AND). Missing gender or preference data on either side
/// fails closed rather than defaulting to "any".
pub fn mutual_gender(
    pref_a: Option<GenderPreference>,
    gender_a: Option<Gender>,
    pref_b: Option<GenderPreference>,
    gender_b: Option<Gender>,
) -> bool {
    match (pref_a, gender_a, pref_b, gender_b) {
        (Some(pref_a), Some(gender_a), Some(pref_b), Some(gender_b)) => {
            pref_a.admits(gender_b) && pref_b.admits(gender_a)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Stop, WallClock};
    use chrono::NaiveDate;

    fn seg_on(from: &str, to: &str, time: &str, date: NaiveDate) -> Segment {
        Segment::new(
            Stop::parse(from).unwrap(),
            Stop::parse(to).unwrap(),
            WallClock::parse_hhmm(time, date).unwrap(),
        )
    }

    fn seg(from: &str, to: &str, time: &str) -> Segment {
        seg_on(from, to, time, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[test]
    fn matches_same_route_and_close_time() {
        let a = seg("Delhi", "Jaipur", "09:00");
        let b = seg("Delhi", "Jaipur", "09:30");
        assert!(segments_match(&a, &b, 60));
    }

    #[test]
    fn matches_ignore_stop_case() {
        let a = seg("Delhi", "Jaipur", "09:00");
        let b = seg("DELHI", "jaipur", "09:00");
        assert!(segments_match(&a, &b, 60));
    }

    #[test]
    fn rejects_different_route() {
        let a = seg("Delhi", "Jaipur", "09:00");
        assert!(!segments_match(&a, &seg("Delhi", "Agra", "09:00"), 60));
        assert!(!segments_match(&a, &seg("Mumbai", "Jaipur", "09:00"), 60));
    }

    #[test]
    fn rejects_different_date() {
        let a = seg("Delhi", "Jaipur", "09:00");
        let other_day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let b = seg_on("Delhi", "Jaipur", "09:00", other_day);
        assert!(!segments_match(&a, &b, 60));
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let a = seg("Delhi", "Jaipur", "09:00");
        // Exactly 60 minutes apart: match.
        assert!(segments_match(&a, &seg("Delhi", "Jaipur", "10:00"), 60));
        // 61 minutes apart: no match.
        assert!(!segments_match(&a, &seg("Delhi", "Jaipur", "10:01"), 60));
    }

    #[test]
    fn tolerance_is_configurable() {
        let a = seg("Delhi", "Jaipur", "09:00");
        let b = seg("Delhi", "Jaipur", "09:20");
        assert!(!segments_match(&a, &b, 15));
        assert!(segments_match(&a, &b, 20));
    }

    #[test]
    fn gender_mutuality_table() {
        use Gender::*;
        use GenderPreference::*;

        // (any, any) admits anyone.
        assert!(mutual_gender(Some(Any), Some(Male), Some(Any), Some(Female)));
        // One-sided refusal blocks the pair.
        assert!(!mutual_gender(Some(OnlyMales), Some(Male), Some(Any), Some(Female)));
        // A prefers only females and B is female; B takes anyone. Works
        // both ways even though A himself is male.
        assert!(mutual_gender(Some(OnlyFemales), Some(Male), Some(Any), Some(Female)));
        // Both restrictive and satisfied.
        assert!(mutual_gender(
            Some(OnlyFemales),
            Some(Female),
            Some(OnlyFemales),
            Some(Female)
        ));
    }

    #[test]
    fn missing_data_fails_closed() {
        use Gender::*;
        use GenderPreference::*;

        assert!(!mutual_gender(None, Some(Male), Some(Any), Some(Female)));
        assert!(!mutual_gender(Some(Any), None, Some(Any), Some(Female)));
        assert!(!mutual_gender(Some(Any), Some(Male), None, Some(Female)));
        assert!(!mutual_gender(Some(Any), Some(Male), Some(Any), None));
        assert!(!mutual_gender(None, None, None, None));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Stop, WallClock};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn stop_name() -> impl Strategy<Value = String> {
        "[A-Za-z]{2,12}"
    }

    prop_compose! {
        fn segment()(
            from in stop_name(),
            to in stop_name(),
            hour in 0u32..24,
            minute in 0u32..60,
            day in 1u32..=28,
        ) -> Segment {
            let date = NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
            let time = format!("{:02}:{:02}", hour, minute);
            Segment::new(
                Stop::parse(&from).unwrap(),
                Stop::parse(&to).unwrap(),
                WallClock::parse_hhmm(&time, date).unwrap(),
            )
        }
    }

    proptest! {
        /// Segment matching is symmetric for any pair of segments.
        #[test]
        fn match_symmetric(a in segment(), b in segment(), tol in 0i64..180) {
            prop_assert_eq!(
                segments_match(&a, &b, tol),
                segments_match(&b, &a, tol)
            );
        }

        /// A segment always matches itself at any non-negative tolerance.
        #[test]
        fn match_reflexive(a in segment(), tol in 0i64..180) {
            prop_assert!(segments_match(&a, &a, tol));
        }

        /// Mutual gender is symmetric under swapping the two sides.
        #[test]
        fn gender_symmetric(
            pref_a in proptest::option::of(prop_oneof![
                Just(GenderPreference::Any),
                Just(GenderPreference::OnlyMales),
                Just(GenderPreference::OnlyFemales),
            ]),
            gender_a in proptest::option::of(prop_oneof![Just(Gender::Male), Just(Gender::Female)]),
            pref_b in proptest::option::of(prop_oneof![
                Just(GenderPreference::Any),
                Just(GenderPreference::OnlyMales),
                Just(GenderPreference::OnlyFemales),
            ]),
            gender_b in proptest::option::of(prop_oneof![Just(Gender::Male), Just(Gender::Female)]),
        ) {
            prop_assert_eq!(
                mutual_gender(pref_a, gender_a, pref_b, gender_b),
                mutual_gender(pref_b, gender_b, pref_a, gender_a)
            );
        }
    }
}
