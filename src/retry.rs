//! Retry policy for remote operations with heuristic error classification.

use rand::Rng;
use std::time::Duration;

/// Maximum number of attempts for a retried remote operation.
pub const MAX_ATTEMPTS: u32 = 3;

/// Base delay of the exponential backoff.
pub const BASE_DELAY: Duration = Duration::from_secs(1);

/// Upper bound (exclusive) of the random jitter added to every delay.
pub const MAX_JITTER: Duration = Duration::from_secs(1);

/// Whether a failed attempt is worth repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The call may not have been processed remotely (timeouts, deadlines).
    Transient,
    /// Anything else. Repeating it could duplicate a remote side effect.
    Terminal,
}

impl FailureClass {
    pub fn is_transient(self) -> bool {
        self == FailureClass::Transient
    }
}

/// Classifies a failure by its message text.
///
/// A message mentioning "timeout" or "deadline" (case-insensitive) is
/// transient, everything else is terminal.
pub fn classify(message: &str) -> FailureClass {
    let message = message.to_lowercase();
    if message.contains("timeout") || message.contains("deadline") {
        FailureClass::Transient
    } else {
        FailureClass::Terminal
    }
}

/// The result of a single attempt inside a retry loop.
#[derive(Debug)]
pub enum AttemptOutcome<T, E> {
    Success(T),
    Failure {
        error: E,
        class: FailureClass,
        attempt: u32,
    },
}

/// What the loop should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry { delay: Duration },
    GiveUp,
}

/// Exponential backoff with additive jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: BASE_DELAY,
            max_jitter: MAX_JITTER,
        }
    }
}

impl RetryPolicy {
    /// Deterministic part of the delay before the attempt following `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Full delay: `base_delay * 2^attempt` plus a uniform jitter in `[0, max_jitter)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let jitter = if self.max_jitter.is_zero() {
            Duration::ZERO
        } else {
            let factor: f64 = rand::rng().random_range(0.0..1.0);
            self.max_jitter.mul_f64(factor)
        };
        self.backoff(attempt) + jitter
    }

    /// Whether `attempt` (zero-based) is the final one this policy allows.
    pub fn is_last_attempt(&self, attempt: u32) -> bool {
        attempt + 1 >= self.max_attempts
    }

    /// Decides how to proceed after `attempt` failed with the given class.
    pub fn decide(&self, attempt: u32, class: FailureClass) -> RetryDecision {
        if class.is_transient() && !self.is_last_attempt(attempt) {
            RetryDecision::Retry {
                delay: self.delay_for(attempt),
            }
        } else {
            RetryDecision::GiveUp
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_timeout() {
        assert_eq!(classify("timeout occurred"), FailureClass::Transient);
        assert_eq!(classify("Request TIMEOUT"), FailureClass::Transient);
    }

    #[test]
    fn test_classify_deadline() {
        assert_eq!(
            classify("DEADLINE_EXCEEDED: Deadline expired before operation could complete."),
            FailureClass::Transient
        );
    }

    #[test]
    fn test_classify_terminal() {
        assert_eq!(classify("The customer id is invalid."), FailureClass::Terminal);
        assert_eq!(classify("connection reset by peer"), FailureClass::Terminal);
        assert_eq!(classify(""), FailureClass::Terminal);
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.max_jitter, Duration::from_secs(1));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_jitter_is_bounded() {
        let policy = RetryPolicy::default();
        for attempt in 0..2 {
            for _ in 0..50 {
                let delay = policy.delay_for(attempt);
                let floor = policy.backoff(attempt);
                assert!(delay >= floor);
                assert!(delay < floor + policy.max_jitter);
            }
        }
    }

    #[test]
    fn test_delay_without_jitter_is_exact() {
        let policy = RetryPolicy {
            max_jitter: Duration::ZERO,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
    }

    #[test]
    fn test_decide_retries_transient_before_last_attempt() {
        let policy = RetryPolicy::default();
        assert!(matches!(
            policy.decide(0, FailureClass::Transient),
            RetryDecision::Retry { .. }
        ));
        assert!(matches!(
            policy.decide(1, FailureClass::Transient),
            RetryDecision::Retry { .. }
        ));
    }

    #[test]
    fn test_decide_gives_up_on_last_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.decide(2, FailureClass::Transient),
            RetryDecision::GiveUp
        );
    }

    #[test]
    fn test_decide_never_retries_terminal() {
        let policy = RetryPolicy::default();
        for attempt in 0..policy.max_attempts {
            assert_eq!(
                policy.decide(attempt, FailureClass::Terminal),
                RetryDecision::GiveUp
            );
        }
    }
}
