use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input was never a usable URL.
    Malformed,
    /// Video does not exist or was removed.
    NotFound,
    /// Private, age-restricted or otherwise refused.
    Denied,
    /// Timeout, DNS or connection failure.
    Transient,
    /// Server answered with this HTTP status.
    Http(u32),
    /// Anything else.
    Other,
}

impl ErrorKind {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(self) -> bool {
        match self {
            ErrorKind::Transient => true,
            ErrorKind::Http(code) => matches!(code, 408 | 429 | 500..=599),
            ErrorKind::Malformed | ErrorKind::NotFound | ErrorKind::Denied | ErrorKind::Other => {
                false
            }
        }
    }
}

/// Which failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryStrategy {
    /// Every failure is retried until attempts run out.
    #[default]
    Always,
    /// Only failures whose kind [`ErrorKind::is_transient`] are retried.
    TransientOnly,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Zero behaves like one.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub pause: Duration,
    pub strategy: RetryStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            pause: Duration::from_secs(2),
            strategy: RetryStrategy::Always,
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after attempt number `attempt` (1-based) failed with `kind`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        match self.strategy {
            RetryStrategy::Always => RetryDecision::RetryAfter(self.pause),
            RetryStrategy::TransientOnly if kind.is_transient() => {
                RetryDecision::RetryAfter(self.pause)
            }
            RetryStrategy::TransientOnly => RetryDecision::NoRetry,
        }
    }
}
