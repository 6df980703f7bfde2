use std::time::Duration;

/// Bounded retry with a fixed cooldown, shared by the summarize and
/// translate stages.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub cooldown: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, cooldown: Duration) -> Self {
        Self {
            max_attempts,
            cooldown,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            cooldown: Duration::from_secs(60),
        }
    }
}
