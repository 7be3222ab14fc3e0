//! End-to-end session runs with scripted input and a fake media service.

use crate::cli::prompt::Prompter;
use crate::cli::session::{Session, SessionStats};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use ytgrab_core::config::{RetryConfig, SessionConfig};
use ytgrab_core::download::DownloadReporter;
use ytgrab_core::media::{MediaError, MediaInfo, MediaService, Stream, TransferProgress};
use ytgrab_core::retry::{Pause, RetryEvent};

/// Resolves URLs on `valid.example`; downloads fail for paths containing "broken".
#[derive(Default)]
struct FakeService {
    resolved: RefCell<Vec<String>>,
    downloaded: RefCell<Vec<String>>,
}

impl MediaService for FakeService {
    fn resolve(&self, url: &str) -> Result<MediaInfo, MediaError> {
        self.resolved.borrow_mut().push(url.to_string());
        if !url.starts_with("https://valid.example/") {
            return Err(MediaError::Malformed(url.to_string()));
        }
        Ok(MediaInfo {
            id: url.to_string(),
            title: url.rsplit('/').next().unwrap_or_default().to_string(),
            streams: vec![Stream {
                format_id: "22".to_string(),
                ext: "mp4".to_string(),
                width: None,
                height: Some(720),
                has_video: true,
                has_audio: true,
                tbr: None,
                url: url.to_string(),
                http_headers: HashMap::new(),
                filesize: None,
                default_filename: "v.mp4".to_string(),
            }],
        })
    }

    fn download(
        &self,
        stream: &Stream,
        output_dir: &Path,
        _progress: &mut dyn FnMut(TransferProgress),
    ) -> Result<PathBuf, MediaError> {
        self.downloaded.borrow_mut().push(stream.url.clone());
        if stream.url.contains("broken") {
            return Err(MediaError::Http(403));
        }
        Ok(output_dir.join(&stream.default_filename))
    }
}

struct CountingPause(RefCell<u32>);

impl Pause for CountingPause {
    fn pause(&self, _delay: Duration) {
        *self.0.borrow_mut() += 1;
    }
}

struct Quiet;

impl DownloadReporter for Quiet {
    fn started(&self, _title: &str) {}
    fn progress(&self, _progress: TransferProgress) {}
    fn completed(&self, _title: &str, _path: &Path) {}
    fn retry_event(&self, _url: &str, _event: &RetryEvent<'_>) {}
}

fn config() -> SessionConfig {
    SessionConfig {
        retry: RetryConfig {
            pause_secs: 0.0,
            ..RetryConfig::default()
        },
        ..SessionConfig::default()
    }
}

struct Run {
    stats: SessionStats,
    output: String,
    service: FakeService,
    pauses: u32,
}

fn run(input: &str) -> Run {
    let service = FakeService::default();
    let cfg = config();
    let pause = CountingPause(RefCell::new(0));
    let reporter = Quiet;
    let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let stats = {
        let session = Session::new(&service, &cfg, &pause, &reporter);
        session.run(&mut prompter).unwrap()
    };
    let pauses = *pause.0.borrow();
    Run {
        stats,
        output: String::from_utf8(prompter.into_output()).unwrap(),
        service,
        pauses,
    }
}

#[test]
fn mixed_batch_downloads_valid_urls_in_order() {
    let r = run("https://valid.example/a badurl https://valid.example/b\ny\nn\n");
    assert_eq!(
        *r.service.downloaded.borrow(),
        vec!["https://valid.example/a", "https://valid.example/b"]
    );
    assert!(r.output.contains("The following URLs have problems"));
    assert!(r.output.contains("badurl"));
    assert!(!r.output.contains("⛓️  https://valid.example/a"));
    assert_eq!(
        r.stats,
        SessionStats {
            batches: 1,
            completed: 2,
            failed: 0
        }
    );
    assert!(r.output.trim_end().ends_with("Program finished."));
}

#[test]
fn invalid_urls_are_never_downloaded() {
    let r = run("badurl https://valid.example/ok ftp://x\n\nn\n");
    assert_eq!(*r.service.downloaded.borrow(), vec!["https://valid.example/ok"]);
}

#[test]
fn only_invalid_urls_skip_confirmation() {
    let r = run("badurl\nn\n");
    assert!(r.service.downloaded.borrow().is_empty());
    assert!(!r.output.contains("Proceed with download?"));
    assert!(r.output.contains("Download more videos?"));
    assert_eq!(r.stats.completed + r.stats.failed, 0);
}

#[test]
fn declined_confirmation_downloads_nothing() {
    let r = run("https://valid.example/a\nn\n\n");
    assert!(r.service.downloaded.borrow().is_empty());
    assert_eq!(r.stats.batches, 1);
}

#[test]
fn repeat_runs_another_batch() {
    let r = run("https://valid.example/a\ny\ny\nhttps://valid.example/b\n\nn\n");
    assert_eq!(r.stats.batches, 2);
    assert_eq!(
        *r.service.downloaded.borrow(),
        vec!["https://valid.example/a", "https://valid.example/b"]
    );
    assert_eq!(r.output.matches("Paste one or more URLs").count(), 2);
    assert_eq!(r.output.matches("YTGRAB").count(), 1, "banner printed once");
}

#[test]
fn failing_url_exhausts_retries_and_batch_continues() {
    let r = run("https://valid.example/broken https://valid.example/fine\ny\nn\n");
    assert_eq!(
        *r.service.downloaded.borrow(),
        vec![
            "https://valid.example/broken",
            "https://valid.example/broken",
            "https://valid.example/broken",
            "https://valid.example/fine"
        ]
    );
    assert_eq!(r.pauses, 2);
    assert_eq!(r.stats.failed, 1);
    assert_eq!(r.stats.completed, 1);
}

#[test]
fn each_url_is_resolved_for_validation_and_download() {
    let r = run("https://valid.example/a\ny\nn\n");
    assert_eq!(
        *r.service.resolved.borrow(),
        vec!["https://valid.example/a", "https://valid.example/a"]
    );
}

#[test]
fn eof_ends_session_gracefully() {
    let r = run("");
    assert_eq!(r.stats, SessionStats::default());
    assert!(r.output.contains("Program finished."));

    let r = run("https://valid.example/a\n");
    assert!(r.service.downloaded.borrow().is_empty());
    assert!(r.output.contains("Program finished."));
}

#[test]
fn invalid_menu_answer_reprompts() {
    let r = run("https://valid.example/a\nsure\ny\nnope\nn\n");
    assert_eq!(r.service.downloaded.borrow().len(), 1);
    assert_eq!(r.output.matches("Invalid input").count(), 2);
}
