//! Runtime configuration for a session.
//!
//! There is no config file; values start from the defaults below and the CLI
//! may override individual fields from command-line flags.

use crate::retry::{RetryPolicy, RetryStrategy};
use std::path::PathBuf;
use std::time::Duration;

/// Directory, relative to the working directory, that downloads land in.
pub const DEFAULT_OUTPUT_DIR: &str = "Videos Downloaded";

/// Retry parameters for a single video download.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts per video (including the first).
    pub max_attempts: u32,
    /// Fixed pause between attempts, in seconds.
    pub pause_secs: f64,
    /// Only retry failures classified as transient.
    pub transient_only: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            pause_secs: 2.0,
            transient_only: false,
        }
    }
}

impl RetryConfig {
    /// Build the policy used by the retry loop. Negative or NaN pauses become zero,
    /// pauses too large for a `Duration` saturate.
    pub fn policy(&self) -> RetryPolicy {
        let pause = if self.pause_secs > 0.0 {
            Duration::try_from_secs_f64(self.pause_secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        RetryPolicy {
            max_attempts: self.max_attempts,
            pause,
            strategy: if self.transient_only {
                RetryStrategy::TransientOnly
            } else {
                RetryStrategy::Always
            },
        }
    }
}

/// How to invoke the external extractor program.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    /// Program to run (looked up in PATH when not a path).
    pub program: PathBuf,
    /// Arguments placed before ours, e.g. `["-m", "yt_dlp"]` with `python3`.
    pub args: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("yt-dlp"),
            args: Vec::new(),
        }
    }
}

/// Everything a session needs besides the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub output_dir: PathBuf,
    pub retry: RetryConfig,
    pub extractor: ExtractorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            retry: RetryConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}
