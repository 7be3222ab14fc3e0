//! Retry controller for one video: resolve, pick the best stream, save it.

use crate::media::{MediaError, MediaService, TransferProgress};
use crate::retry::{run_with_retry, Pause, RetryEvent, RetryPolicy};
use std::path::{Path, PathBuf};

/// Receives what happens during a download. Console output lives behind this.
///
/// Methods take `&self` because the retry loop and the attempt both report
/// while the download is running; implementations use interior mutability.
pub trait DownloadReporter {
    /// Resolution succeeded and the transfer of `title` is about to start.
    fn started(&self, title: &str);
    fn progress(&self, progress: TransferProgress);
    fn completed(&self, title: &str, path: &Path);
    fn retry_event(&self, url: &str, event: &RetryEvent<'_>);
}

/// How a call to [`download_video`] ended.
#[derive(Debug)]
pub enum DownloadOutcome {
    Done { title: String, path: PathBuf },
    Failed { attempts: u32, error: MediaError },
}

impl DownloadOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, DownloadOutcome::Done { .. })
    }
}

/// Downloads the highest-resolution stream of `url` into `output_dir`,
/// retrying per `policy`.
///
/// Each attempt resolves the URL afresh. Errors never escape; they are
/// reported and folded into the returned outcome.
pub fn download_video<S, P, R>(
    service: &S,
    url: &str,
    output_dir: &Path,
    policy: &RetryPolicy,
    pause: &P,
    reporter: &R,
) -> DownloadOutcome
where
    S: MediaService + ?Sized,
    P: Pause + ?Sized,
    R: DownloadReporter + ?Sized,
{
    let result = run_with_retry(
        policy,
        pause,
        |event| {
            log_event(url, &event);
            reporter.retry_event(url, &event);
        },
        |attempt| {
            tracing::debug!(url, attempt, "download attempt");
            let info = service.resolve(url)?;
            reporter.started(&info.title);
            let stream = info.highest_resolution_stream().ok_or(MediaError::NoStream)?;
            tracing::debug!(
                url,
                format_id = %stream.format_id,
                height = ?stream.height,
                "selected stream"
            );
            let path = service.download(stream, output_dir, &mut |p| reporter.progress(p))?;
            Ok((info.title, path))
        },
    );

    match result {
        Ok((title, path)) => {
            tracing::info!(url, path = %path.display(), "download completed");
            reporter.completed(&title, &path);
            DownloadOutcome::Done { title, path }
        }
        Err((attempts, error)) => DownloadOutcome::Failed { attempts, error },
    }
}

fn log_event(url: &str, event: &RetryEvent<'_>) {
    match event {
        RetryEvent::AttemptFailed {
            attempt,
            kind,
            error,
            ..
        } => tracing::warn!(url, attempt, ?kind, "download attempt failed: {}", error),
        RetryEvent::Retrying { delay, .. } => {
            tracing::debug!(url, delay_ms = delay.as_millis() as u64, "retrying")
        }
        RetryEvent::GaveUp {
            attempts,
            exhausted,
            ..
        } => tracing::error!(url, attempts, exhausted, "download failed"),
    }
}
