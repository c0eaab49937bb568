use std::time::Duration;

/// What a worker does with a date whose attempt just failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then put the date back in the queue.
    Retry(Duration),
    /// Stop trying, the date is abandoned.
    GiveUp,
}

/// Attempt cap and backoff for failed queries.
/// The default retries forever without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// `None` means unbounded.
    pub max_attempts: Option<u32>,
    /// Zero disables backoff.
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Decide after `attempt` (1-based) failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        match self.max_attempts {
            Some(max) if attempt >= max => RetryDecision::GiveUp,
            _ => RetryDecision::Retry(self.backoff(attempt)),
        }
    }

    /// Exponential backoff, doubling per failed attempt and capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        if self.initial_backoff.is_zero() {
            return Duration::ZERO;
        }
        let exponent = attempt.saturating_sub(1).min(31);
        let delay = self.initial_backoff.saturating_mul(2u32.pow(exponent));
        delay.min(self.max_backoff.max(self.initial_backoff))
    }
}
