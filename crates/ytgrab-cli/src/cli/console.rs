//! Console output for downloads: status lines plus an indicatif progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::Path;
use ytgrab_core::download::DownloadReporter;
use ytgrab_core::media::TransferProgress;
use ytgrab_core::retry::RetryEvent;

/// Prints one line per download event; shows a bar while bytes arrive.
#[derive(Default)]
pub struct ConsoleReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_bar(total: Option<u64>) -> ProgressBar {
        match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::with_template(
                        "[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {bytes_per_sec} ({eta})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::with_template("{spinner} {bytes} {bytes_per_sec}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb
            }
        }
    }

    /// Removes any bar so the next line prints cleanly.
    fn clear_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl DownloadReporter for ConsoleReporter {
    fn started(&self, title: &str) {
        self.clear_bar();
        println!("🚀 Downloading: {}", title);
    }

    fn progress(&self, progress: TransferProgress) {
        let mut slot = self.bar.borrow_mut();
        let pb = slot.get_or_insert_with(|| Self::new_bar(progress.total_bytes));
        if let Some(total) = progress.total_bytes {
            if pb.length() != Some(total) {
                pb.set_length(total);
            }
        }
        pb.set_position(progress.bytes_done);
    }

    fn completed(&self, title: &str, path: &Path) {
        self.clear_bar();
        println!("✅ Download complete: {}, saved to {}", title, path.display());
    }

    fn retry_event(&self, _url: &str, event: &RetryEvent<'_>) {
        self.clear_bar();
        match event {
            RetryEvent::AttemptFailed { error, .. } if error.is_http() => {
                println!("❌ HTTP error while downloading the video: {}", error)
            }
            RetryEvent::AttemptFailed { error, .. } => {
                println!("❌ Error downloading the video: {}", error)
            }
            RetryEvent::Retrying {
                attempt,
                max_attempts,
                ..
            } => println!("🔄 Retrying... ({}/{})", attempt, max_attempts),
            RetryEvent::GaveUp {
                exhausted: true, ..
            } => println!("❌ Download failed after several attempts."),
            RetryEvent::GaveUp { error, .. } => {
                println!("❌ Download failed, not retrying: {}", error)
            }
        }
    }
}
