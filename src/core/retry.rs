use std::time::Duration;

/// Retry budget shared by context truncation and backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries allowed after the first attempt (default: 5)
    pub max_retries: u32,
    /// Backoff unit; the delay before retry `n` is `2^n * base_delay` (default: 1s)
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Exponential backoff without jitter or cap.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
    }
}

/// Attempt counter for one logical request.
#[derive(Debug, Clone)]
pub(crate) struct RetryState {
    attempt: u32,
    max_retries: u32,
}

impl RetryState {
    pub(crate) fn new(max_retries: u32) -> Self {
        Self {
            attempt: 0,
            max_retries,
        }
    }

    pub(crate) fn attempt(&self) -> u32 {
        self.attempt
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.attempt > self.max_retries
    }

    pub(crate) fn has_retry_left(&self) -> bool {
        self.attempt < self.max_retries
    }

    pub(crate) fn advance(&mut self) {
        self.attempt = self.attempt.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_per_attempt() {
        let config = RetryConfig::default();
        let delays: Vec<u128> = (0..5).map(|a| config.delay_for(a).as_millis()).collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 8000, 16000]);
    }

    #[test]
    fn delay_saturates_instead_of_overflowing() {
        let config = RetryConfig::default();
        assert_eq!(
            config.delay_for(64),
            Duration::from_millis(1000).saturating_mul(u32::MAX)
        );
    }

    #[test]
    fn state_allows_first_attempt_plus_max_retries() {
        let mut state = RetryState::new(5);
        let mut attempts = 0;
        while !state.is_exhausted() {
            attempts += 1;
            state.advance();
        }
        assert_eq!(attempts, 6);
        assert_eq!(state.attempt(), 6);
    }

    #[test]
    fn last_attempt_has_no_retry_left() {
        let mut state = RetryState::new(1);
        assert!(state.has_retry_left());
        state.advance();
        assert!(!state.has_retry_left());
        assert!(!state.is_exhausted());
    }
}
