//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::pause::Pause;
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};
use crate::media::MediaError;
use std::time::Duration;

/// What the retry loop is doing, for the caller to report.
#[derive(Debug)]
pub enum RetryEvent<'a> {
    /// Attempt `attempt` failed with `error`.
    AttemptFailed {
        attempt: u32,
        max_attempts: u32,
        kind: ErrorKind,
        error: &'a MediaError,
    },
    /// About to pause `delay` and try again; `attempt` attempts have failed so far.
    Retrying {
        attempt: u32,
        max_attempts: u32,
        delay: Duration,
    },
    /// No more attempts. `exhausted` is false when the policy refused a retry early.
    GaveUp {
        attempts: u32,
        exhausted: bool,
        error: &'a MediaError,
    },
}

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// `f` receives the 1-based attempt number. On a retryable failure the loop
/// reports the event, pauses via `pause`, then tries again. Always makes at
/// least one attempt.
pub fn run_with_retry<T, F, P, O>(
    policy: &RetryPolicy,
    pause: &P,
    mut on_event: O,
    mut f: F,
) -> Result<T, (u32, MediaError)>
where
    F: FnMut(u32) -> Result<T, MediaError>,
    P: Pause + ?Sized,
    O: FnMut(RetryEvent<'_>),
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                on_event(RetryEvent::AttemptFailed {
                    attempt,
                    max_attempts: policy.max_attempts,
                    kind,
                    error: &e,
                });
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        on_event(RetryEvent::GaveUp {
                            attempts: attempt,
                            exhausted: attempt >= policy.max_attempts,
                            error: &e,
                        });
                        return Err((attempt, e));
                    }
                    RetryDecision::RetryAfter(d) => {
                        on_event(RetryEvent::Retrying {
                            attempt,
                            max_attempts: policy.max_attempts,
                            delay: d,
                        });
                        pause.pause(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
