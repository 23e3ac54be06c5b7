//! Wall-clock departure times.
//!
//! Trips and legs carry a calendar date plus an "HH:MM" departure time,
//! as the traveler would read them off a ticket. Those wall-clock values
//! are interpreted in a single fixed reference timezone when they need to
//! be compared against real time, so the auto-completion sweep behaves the
//! same regardless of where the server runs.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use std::fmt;

/// India Standard Time offset (UTC+05:30), the reference timezone for
/// interpreting wall-clock departure times.
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Returns the fixed reference timezone offset.
pub fn reference_offset() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is in range")
}

/// Error returned when parsing an invalid "HH:MM" time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: expected HH:MM")]
pub struct InvalidTime;

/// A scheduled departure: calendar date plus time of day, minute precision.
///
/// A `WallClock` is a civil time with no attached zone. Use [`instant`]
/// to resolve it to an absolute instant in the reference timezone, and
/// [`minute_of_day`] for tolerance comparisons between two departures.
///
/// [`instant`]: WallClock::instant
/// [`minute_of_day`]: WallClock::minute_of_day
///
/// # Examples
///
/// ```
/// use ride_server::domain::WallClock;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let clock = WallClock::parse_hhmm("09:30", date).unwrap();
/// assert_eq!(clock.minute_of_day(), 9 * 60 + 30);
/// assert_eq!(clock.hhmm(), "09:30");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallClock {
    date: NaiveDate,
    time: NaiveTime,
}

impl WallClock {
    /// Create a wall-clock value from date and time components.
    ///
    /// Seconds and finer are truncated; departures are minute precision.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
            .expect("truncated time is valid");
        Self { date, time }
    }

    /// Parse a departure time from "HH:MM" format with a given date.
    ///
    /// # Examples
    ///
    /// ```
    /// use ride_server::domain::WallClock;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    /// assert!(WallClock::parse_hhmm("00:00", date).is_ok());
    /// assert!(WallClock::parse_hhmm("23:59", date).is_ok());
    /// assert!(WallClock::parse_hhmm("25:00", date).is_err());
    /// assert!(WallClock::parse_hhmm("0900", date).is_err());
    /// ```
    pub fn parse_hhmm(s: &str, date: NaiveDate) -> Result<Self, InvalidTime> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| InvalidTime)?;
        Ok(Self { date, time })
    }

    /// Returns the calendar date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time of day.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Returns minutes since midnight (0..=1439).
    pub fn minute_of_day(&self) -> u32 {
        self.time.hour() * 60 + self.time.minute()
    }

    /// Returns the time formatted as "HH:MM".
    pub fn hhmm(&self) -> String {
        format!("{:02}:{:02}", self.time.hour(), self.time.minute())
    }

    /// Resolve this wall-clock value to an absolute instant, interpreting
    /// it in the fixed reference timezone.
    pub fn instant(&self) -> DateTime<Utc> {
        let utc_naive = self.date.and_time(self.time) - Duration::seconds(IST_OFFSET_SECS as i64);
        Utc.from_utc_datetime(&utc_naive)
    }
}

impl fmt::Debug for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WallClock({} {})", self.date, self.hhmm())
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.hhmm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        let d = date(2024, 5, 1);
        let t = WallClock::parse_hhmm("09:05", d).unwrap();
        assert_eq!(t.minute_of_day(), 545);
        assert_eq!(t.hhmm(), "09:05");
    }

    #[test]
    fn parse_invalid_times() {
        let d = date(2024, 5, 1);
        assert!(WallClock::parse_hhmm("24:00", d).is_err());
        assert!(WallClock::parse_hhmm("12:60", d).is_err());
        assert!(WallClock::parse_hhmm("0900", d).is_err());
        assert!(WallClock::parse_hhmm("", d).is_err());
        assert!(WallClock::parse_hhmm("morning", d).is_err());
    }

    #[test]
    fn new_truncates_seconds() {
        let d = date(2024, 5, 1);
        let t = NaiveTime::from_hms_opt(9, 30, 45).unwrap();
        let clock = WallClock::new(d, t);
        assert_eq!(clock.hhmm(), "09:30");
    }

    #[test]
    fn instant_applies_reference_offset() {
        // 09:00 IST is 03:30 UTC.
        let d = date(2024, 5, 1);
        let clock = WallClock::parse_hhmm("09:00", d).unwrap();
        let instant = clock.instant();
        assert_eq!(instant.to_rfc3339(), "2024-05-01T03:30:00+00:00");
    }

    #[test]
    fn instant_crosses_date_boundary() {
        // 00:15 IST on 1 May is 18:45 UTC on 30 April.
        let d = date(2024, 5, 1);
        let clock = WallClock::parse_hhmm("00:15", d).unwrap();
        assert_eq!(clock.instant().to_rfc3339(), "2024-04-30T18:45:00+00:00");
    }

    #[test]
    fn instants_order_with_wall_clock() {
        let d = date(2024, 5, 1);
        let earlier = WallClock::parse_hhmm("09:00", d).unwrap();
        let later = WallClock::parse_hhmm("09:30", d).unwrap();
        assert!(earlier.instant() < later.instant());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_date()(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28
        ) -> NaiveDate {
            NaiveDate::from_ymd_opt(year, month, day).unwrap()
        }
    }

    proptest! {
        /// Any HH:MM within range parses, and hhmm() roundtrips it.
        #[test]
        fn parse_hhmm_roundtrip(hour in 0u32..24, minute in 0u32..60, date in valid_date()) {
            let s = format!("{:02}:{:02}", hour, minute);
            let clock = WallClock::parse_hhmm(&s, date).unwrap();
            prop_assert_eq!(clock.hhmm(), s);
        }

        /// minute_of_day is consistent with the parsed components.
        #[test]
        fn minute_of_day_consistent(hour in 0u32..24, minute in 0u32..60, date in valid_date()) {
            let s = format!("{:02}:{:02}", hour, minute);
            let clock = WallClock::parse_hhmm(&s, date).unwrap();
            prop_assert_eq!(clock.minute_of_day(), hour * 60 + minute);
        }

        /// The resolved instant is always exactly the IST offset behind
        /// the naive wall-clock reading.
        #[test]
        fn instant_offset_exact(hour in 0u32..24, minute in 0u32..60, date in valid_date()) {
            let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
            let clock = WallClock::new(date, time);
            let expected = date.and_time(time) - Duration::seconds(IST_OFFSET_SECS as i64);
            prop_assert_eq!(clock.instant().naive_utc(), expected);
        }
    }
}
