//! The external media service: resolve a URL into metadata and streams, then
//! transfer one stream to disk.
//!
//! Everything above this module only depends on the [`MediaService`] trait,
//! so the validation and retry logic can run against a fake in tests.

mod error;
mod filename;
pub mod http;
mod select;
mod ytdlp;

pub use error::MediaError;
pub use filename::{default_filename, sanitize_title};
pub use http::download_stream;
pub use ytdlp::{classify_stderr, YtDlp};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A successfully resolved remote media item.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub id: String,
    pub title: String,
    pub streams: Vec<Stream>,
}

impl MediaInfo {
    /// Best progressive (audio + video) stream by resolution, if any.
    pub fn highest_resolution_stream(&self) -> Option<&Stream> {
        select::highest_resolution(&self.streams)
    }
}

/// One downloadable rendition of a media item.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    pub format_id: String,
    /// Container extension, e.g. `mp4`.
    pub ext: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub has_video: bool,
    pub has_audio: bool,
    /// Total bitrate in kbit/s, used to break resolution ties.
    pub tbr: Option<f64>,
    /// Direct URL of the media bytes.
    pub url: String,
    /// Headers the host expects on the GET.
    pub http_headers: HashMap<String, String>,
    pub filesize: Option<u64>,
    /// File name to save under, derived from the title and extension.
    pub default_filename: String,
}

impl Stream {
    pub fn is_progressive(&self) -> bool {
        self.has_video && self.has_audio
    }
}

/// Snapshot handed to the progress hook during a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub bytes_done: u64,
    /// Total size, when the server or the extractor announced one.
    pub total_bytes: Option<u64>,
}

/// Capabilities required from the resolution/download collaborator.
pub trait MediaService {
    /// Open a media resource. Any error means the URL is not usable.
    fn resolve(&self, url: &str) -> Result<MediaInfo, MediaError>;

    /// Transfer `stream` into `output_dir` (created if absent) and return the written path.
    fn download(
        &self,
        stream: &Stream,
        output_dir: &Path,
        progress: &mut dyn FnMut(TransferProgress),
    ) -> Result<PathBuf, MediaError>;
}

impl<S: MediaService + ?Sized> MediaService for &S {
    fn resolve(&self, url: &str) -> Result<MediaInfo, MediaError> {
        (**self).resolve(url)
    }

    fn download(
        &self,
        stream: &Stream,
        output_dir: &Path,
        progress: &mut dyn FnMut(TransferProgress),
    ) -> Result<PathBuf, MediaError> {
        (**self).download(stream, output_dir, progress)
    }
}
