//! Retry and backoff policy.
//!
//! This module encapsulates error classification (malformed input, missing
//! or private videos, transient network trouble, HTTP status) and the fixed
//! pause between attempts, so the download controller only has to say what
//! one attempt is.

mod classify;
mod pause;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use pause::{Pause, ThreadPause};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy, RetryStrategy};
pub use run::{run_with_retry, RetryEvent};
