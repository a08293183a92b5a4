//! Polling configuration.

use std::time::Duration;

/// Configuration for how a session polls a submitted scan.
///
/// Batch scans run for minutes to hours and the service rate-limits
/// batch accounts, so polling starts gentle and backs off further up to
/// a ceiling. There is no overall deadline unless `max_wait` is set.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the second poll (the first happens immediately).
    pub initial_interval: Duration,

    /// Ceiling on the delay between polls.
    pub max_interval: Duration,

    /// Multiplier applied to the delay after each poll.
    pub backoff_multiplier: f64,

    /// Overall limit on how long to wait for one scan, if any.
    pub max_wait: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(15),
            max_interval: Duration::from_secs(120),
            backoff_multiplier: 1.5,
            max_wait: None,
        }
    }
}

impl PollConfig {
    /// Creates a new polling configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with zero delays, for tests.
    pub fn immediate() -> Self {
        Self {
            initial_interval: Duration::ZERO,
            max_interval: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Sets the initial interval.
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    /// Sets the interval ceiling.
    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    /// Sets the backoff multiplier.
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier.max(1.0);
        self
    }

    /// Sets the overall wait limit.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Calculates the delay after a given poll (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_delay =
            self.initial_interval.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let capped_delay = base_delay.min(self.max_interval.as_millis() as f64);
        Duration::from_millis(capped_delay as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PollConfig::default();
        assert_eq!(config.initial_interval, Duration::from_secs(15));
        assert_eq!(config.max_interval, Duration::from_secs(120));
        assert!(config.max_wait.is_none());
    }

    #[test]
    fn test_delay_grows_with_backoff() {
        let config = PollConfig::new()
            .with_initial_interval(Duration::from_secs(10))
            .with_backoff_multiplier(2.0)
            .with_max_interval(Duration::from_secs(600));

        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(10));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(20));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(40));
    }

    #[test]
    fn test_delay_capped_at_max_interval() {
        let config = PollConfig::new()
            .with_initial_interval(Duration::from_secs(60))
            .with_backoff_multiplier(10.0)
            .with_max_interval(Duration::from_secs(120));

        // 60 * 10 = 600, but capped at 120
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(120));
    }

    #[test]
    fn test_immediate_has_zero_delays() {
        let config = PollConfig::immediate();
        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(5), Duration::ZERO);
    }
}
