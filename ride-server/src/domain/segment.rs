//! Point-to-point travel segment.

use std::fmt;

use super::{Stop, WallClock};

/// One point-to-point segment of a journey: where it starts, where it
/// ends, and when it departs.
///
/// A direct trip is a single segment; a multi-leg trip is an ordered
/// sequence of them. Compatibility between two travelers is always decided
/// segment against segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    origin: Stop,
    destination: Stop,
    departs: WallClock,
}

impl Segment {
    /// Create a segment.
    pub fn new(origin: Stop, destination: Stop, departs: WallClock) -> Self {
        Self {
            origin,
            destination,
            departs,
        }
    }

    /// Returns the boarding stop.
    pub fn origin(&self) -> &Stop {
        &self.origin
    }

    /// Returns the alighting stop.
    pub fn destination(&self) -> &Stop {
        &self.destination
    }

    /// Returns the scheduled departure.
    pub fn departs(&self) -> WallClock {
        self.departs
    }

    /// Human-readable label for this segment, used to key discovery
    /// results: `"origin → destination"`.
    pub fn label(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.departs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn segment(from: &str, to: &str, time: &str) -> Segment {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Segment::new(
            Stop::parse(from).unwrap(),
            Stop::parse(to).unwrap(),
            WallClock::parse_hhmm(time, date).unwrap(),
        )
    }

    #[test]
    fn label_uses_arrow() {
        let seg = segment("Delhi", "Jaipur", "09:00");
        assert_eq!(seg.label(), "Delhi → Jaipur");
    }

    #[test]
    fn label_preserves_casing() {
        let seg = segment("delhi", "JAIPUR", "09:00");
        assert_eq!(seg.label(), "delhi → JAIPUR");
    }

    #[test]
    fn accessors() {
        let seg = segment("Delhi", "Jaipur", "09:00");
        assert_eq!(seg.origin(), &Stop::parse("DELHI").unwrap());
        assert_eq!(seg.destination(), &Stop::parse("jaipur").unwrap());
        assert_eq!(seg.departs().hhmm(), "09:00");
    }
}
