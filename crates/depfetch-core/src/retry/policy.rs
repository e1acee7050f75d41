use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Network-level failure (connection refused/reset, DNS, dropped body).
    Connection,
    /// The server answered with a non-200 status.
    Status(u32),
    /// Anything else: local I/O, malformed URL, TLS setup.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same wait before every retry.
    Fixed(Duration),
    /// base * 2^(attempt-1), capped at `max`.
    Exponential { base: Duration, max: Duration },
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    /// Five consecutive attempts, five seconds apart.
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Backoff::Fixed(Duration::from_secs(5)),
        }
    }
}

impl RetryPolicy {
    /// Policy that never waits; for tests and local mirrors.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(Duration::ZERO),
        }
    }

    /// Decide what to do after `attempt` (1-based) failed with `kind`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Status(_) | ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout | ErrorKind::Connection => {
                RetryDecision::RetryAfter(self.delay_for(attempt))
            }
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(d) => d,
            Backoff::Exponential { base, max } => {
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                base.saturating_mul(exp).min(max)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_retry_for_status_or_other() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Status(404)), RetryDecision::NoRetry);
        assert_eq!(p.decide(1, ErrorKind::Status(503)), RetryDecision::NoRetry);
        assert_eq!(p.decide(1, ErrorKind::Other), RetryDecision::NoRetry);
    }

    #[test]
    fn default_waits_five_seconds_between_five_attempts() {
        let p = RetryPolicy::default();
        for attempt in 1..5 {
            assert_eq!(
                p.decide(attempt, ErrorKind::Connection),
                RetryDecision::RetryAfter(Duration::from_secs(5))
            );
        }
        assert_eq!(p.decide(5, ErrorKind::Connection), RetryDecision::NoRetry);
        assert_eq!(p.decide(5, ErrorKind::Timeout), RetryDecision::NoRetry);
    }

    #[test]
    fn exponential_backoff_grows_and_is_capped() {
        let p = RetryPolicy {
            max_attempts: 20,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(250),
                max: Duration::from_secs(30),
            },
        };
        let delay = |attempt| match p.decide(attempt, ErrorKind::Timeout) {
            RetryDecision::RetryAfter(d) => d,
            RetryDecision::NoRetry => panic!("expected retry"),
        };
        assert_eq!(delay(1), Duration::from_millis(250));
        assert_eq!(delay(2), Duration::from_millis(500));
        assert_eq!(delay(3), Duration::from_secs(1));
        assert_eq!(delay(15), Duration::from_secs(30));
    }

    #[test]
    fn single_attempt_policy_never_retries() {
        let p = RetryPolicy::immediate(1);
        assert_eq!(p.decide(1, ErrorKind::Connection), RetryDecision::NoRetry);
    }
}
