use rand::Rng;
use std::time::Duration;

/// Backoff policy for message delivery
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub base_delay_secs: u64,
    pub max_delay_secs: u64,
    pub max_attempts: u32,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_secs: 2,
            max_delay_secs: 30,
            max_attempts: 3,
            jitter_factor: 0.1, // ±10%
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            base_delay_secs: 0,
            max_delay_secs: 0,
            max_attempts: 1,
            jitter_factor: 0.0,
        }
    }

    /// Delay before retrying after failed attempt number `attempt` (0-based)
    /// delay = min(base × 2^attempt × (1 ± jitter), max)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay_secs as f64 * 2_f64.powi(attempt as i32);

        let jitter = if self.jitter_factor > 0.0 {
            let mut rng = rand::rng();
            1.0 + (rng.random::<f64>() * 2.0 - 1.0) * self.jitter_factor
        } else {
            1.0
        };

        let capped = (exponential * jitter).min(self.max_delay_secs as f64);
        Duration::from_secs_f64(capped.max(0.0))
    }

    /// Whether attempt number `attempt` (0-based) may still be made
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
