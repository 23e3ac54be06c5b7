//! Core configuration.

use chrono::Duration;

/// Tunable parameters for matching, completion and chat admission.
///
/// The tolerance, grace buffer and daily cap are policy knobs, not
/// invariants; deployments have run with tighter values.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Departure-time tolerance for leg matching (minutes). Two legs on
    /// the same route and date match when their departures differ by at
    /// most this many minutes.
    pub time_tolerance_mins: i64,

    /// Grace buffer added after an accepted pair's latest departure
    /// before the sweep retires it (hours).
    pub completion_grace_hours: i64,

    /// Maximum messages per sender per connection per UTC day.
    pub daily_message_cap: usize,

    /// Interval between background sweep runs (seconds).
    pub sweep_interval_secs: u64,

    /// Shared secret for the external cron trigger. `None` disables the
    /// internal endpoint.
    pub cron_secret: Option<String>,
}

impl CoreConfig {
    /// Returns the grace buffer as a Duration.
    pub fn completion_grace(&self) -> Duration {
        Duration::hours(self.completion_grace_hours)
    }

    /// Returns the match tolerance as a Duration.
    pub fn time_tolerance(&self) -> Duration {
        Duration::minutes(self.time_tolerance_mins)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            time_tolerance_mins: 60,
            completion_grace_hours: 6,
            daily_message_cap: 20,
            sweep_interval_secs: 24 * 60 * 60, // daily
            cron_secret: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CoreConfig::default();

        assert_eq!(config.time_tolerance_mins, 60);
        assert_eq!(config.completion_grace_hours, 6);
        assert_eq!(config.daily_message_cap, 20);
        assert_eq!(config.sweep_interval_secs, 86_400);
        assert!(config.cron_secret.is_none());
    }

    #[test]
    fn duration_methods() {
        let config = CoreConfig::default();
        assert_eq!(config.completion_grace(), Duration::hours(6));
        assert_eq!(config.time_tolerance(), Duration::minutes(60));
    }
}
