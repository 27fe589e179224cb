use std::time::Duration;

use rand::Rng;

/// Configuration for auto-reconnect behavior
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectConfig {
    /// Maximum number of consecutive reconnect attempts (0 = infinite)
    pub max_attempts: u32,
    /// Delay before the first reconnect attempt
    pub initial_delay: Duration,
    /// Upper bound for the backoff delay, before jitter
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Fraction of the delay randomly added or subtracted (0.0 disables jitter)
    pub jitter: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 1.5,
            jitter: 0.2,
        }
    }
}

impl ReconnectConfig {
    /// Retry every `delay` forever, without growth or jitter.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            max_attempts: 0,
            initial_delay: delay,
            max_delay: delay,
            backoff_multiplier: 1.0,
            jitter: 0.0,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Whether `attempt` (zero based) is beyond the retry budget.
    pub fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts > 0 && attempt >= self.max_attempts
    }

    /// Backoff delay for a given attempt number, without jitter.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.max(1.0).powi(exponent);
        let capped = secs.min(self.max_delay.as_secs_f64());
        if capped.is_finite() {
            Duration::from_secs_f64(capped)
        } else {
            self.max_delay
        }
    }

    /// Delay to wait before a given attempt number, with jitter applied.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.backoff_for_attempt(attempt);
        if self.jitter <= 0.0 || base.is_zero() {
            return base;
        }
        let spread = base.as_secs_f64() * self.jitter.min(1.0);
        let offset = rand::thread_rng().gen_range(-spread..=spread);
        Duration::from_secs_f64((base.as_secs_f64() + offset).max(0.0))
    }
}
