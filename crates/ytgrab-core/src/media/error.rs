//! Errors raised by the media service.

use thiserror::Error;

/// Why resolving or transferring a media item failed.
///
/// The variants carry enough information for [`crate::retry::classify`] to
/// separate failures worth retrying from ones that never will succeed.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Input is not an http(s) URL the extractor understands.
    #[error("malformed URL: {0}")]
    Malformed(String),
    /// The video does not exist or was removed.
    #[error("video unavailable: {0}")]
    NotFound(String),
    /// Private, age-restricted, members-only or otherwise refused.
    #[error("access denied: {0}")]
    Denied(String),
    /// DNS, connection or timeout failure reported by the extractor.
    #[error("network error: {0}")]
    Network(String),
    /// Server answered with a non-success status.
    #[error("HTTP Error {0}")]
    Http(u32),
    /// Resolved, but no progressive stream with a direct URL was offered.
    #[error("no downloadable stream available")]
    NoStream,
    /// URL points at a playlist rather than a single video.
    #[error("playlists are not supported: {0}")]
    Playlist(String),
    /// The extractor program could not be started.
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unexpected extractor output: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("transfer failed: {0}")]
    Curl(#[from] curl::Error),
    #[error("{0}")]
    Other(String),
}

impl MediaError {
    /// True for failures at the HTTP layer (status codes), which get their own message.
    pub fn is_http(&self) -> bool {
        matches!(self, MediaError::Http(_))
    }
}
