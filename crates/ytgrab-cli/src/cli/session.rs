//! The interactive loop: read URLs, classify, confirm, download, repeat.

use super::prompt::Prompter;
use std::io::{self, BufRead, Write};
use ytgrab_core::batch::classify_urls;
use ytgrab_core::config::SessionConfig;
use ytgrab_core::download::{download_video, DownloadReporter};
use ytgrab_core::media::MediaService;
use ytgrab_core::retry::{Pause, RetryPolicy};

const BANNER: &str = "\n\
=========================================================================\n\
==========                       YTGRAB                        ==========\n\
=========================================================================\n";

/// Counters for one run of [`Session::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// URL lines read.
    pub batches: usize,
    pub completed: usize,
    pub failed: usize,
}

pub struct Session<'a, S: ?Sized, P, R: ?Sized> {
    service: &'a S,
    config: &'a SessionConfig,
    policy: RetryPolicy,
    pause: P,
    reporter: &'a R,
}

impl<'a, S, P, R> Session<'a, S, P, R>
where
    S: MediaService + ?Sized,
    P: Pause,
    R: DownloadReporter + ?Sized,
{
    pub fn new(service: &'a S, config: &'a SessionConfig, pause: P, reporter: &'a R) -> Self {
        Self {
            service,
            config,
            policy: config.retry.policy(),
            pause,
            reporter,
        }
    }

    /// Runs until the user declines to continue or input ends.
    ///
    /// Only terminal I/O errors escape; download failures are reported and counted.
    pub fn run<I: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<I, W>,
    ) -> io::Result<SessionStats> {
        let mut stats = SessionStats::default();
        writeln!(prompter.output(), "{}", BANNER)?;

        loop {
            let Some(urls) = prompter.read_urls()? else {
                break;
            };
            writeln!(prompter.output())?;
            stats.batches += 1;

            let batch = classify_urls(self.service, urls);

            if !batch.invalid.is_empty() {
                writeln!(prompter.output(), "🚨 The following URLs have problems:\n")?;
                for url in &batch.invalid {
                    writeln!(prompter.output(), "⛓️  {}\n", url)?;
                }
            }

            if !batch.valid.is_empty() {
                match prompter.ask_for_confirmation()? {
                    None => break,
                    Some(true) => {
                        for url in &batch.valid {
                            let outcome = download_video(
                                self.service,
                                url,
                                &self.config.output_dir,
                                &self.policy,
                                &self.pause,
                                self.reporter,
                            );
                            if outcome.is_done() {
                                stats.completed += 1;
                            } else {
                                stats.failed += 1;
                            }
                        }
                    }
                    Some(false) => tracing::info!(count = batch.valid.len(), "batch declined"),
                }
            }

            if prompter.ask_to_repeat()? != Some(true) {
                break;
            }
        }

        writeln!(prompter.output(), "👋 Program finished.")?;
        Ok(stats)
    }
}
