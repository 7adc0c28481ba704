use std::time::Duration;

use serde::Deserialize;

/// Polling cadence and overall deadline for one job.
///
/// The first `non_exponent_retries` waits use `base_delay`; after that the
/// delay doubles per attempt until the exponent reaches
/// `max_exponent_retries`, and never exceeds `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub non_exponent_retries: u32,
    pub max_exponent_retries: u32,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollSettings::default().into()
    }
}

impl PollPolicy {
    /// Wait before the poll that follows `attempt` (zero based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt
            .saturating_sub(self.non_exponent_retries)
            .min(self.max_exponent_retries);
        let delay = 2u32
            .checked_pow(exponent)
            .map(|factor| self.base_delay.saturating_mul(factor))
            .unwrap_or(self.max_delay);
        delay.min(self.max_delay)
    }
}

/// `[polling]` table of `codemaker.toml`; durations in plain numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub non_exponent_retries: u32,
    pub max_exponent_retries: u32,
    pub timeout_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
            non_exponent_retries: 8,
            max_exponent_retries: 16,
            timeout_secs: 600,
        }
    }
}

impl From<PollSettings> for PollPolicy {
    fn from(s: PollSettings) -> Self {
        Self {
            base_delay: Duration::from_millis(s.base_delay_ms),
            max_delay: Duration::from_millis(s.max_delay_ms),
            non_exponent_retries: s.non_exponent_retries,
            max_exponent_retries: s.max_exponent_retries,
            timeout: Duration::from_secs(s.timeout_secs),
        }
    }
}
