//! CLI for ytgrab: flags, then the interactive session on the terminal.

mod console;
mod prompt;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use ytgrab_core::config::{ExtractorConfig, RetryConfig, SessionConfig, DEFAULT_OUTPUT_DIR};
use ytgrab_core::media::YtDlp;
use ytgrab_core::retry::ThreadPause;

use console::ConsoleReporter;
use prompt::Prompter;
use session::Session;

/// Top-level CLI. Every flag is optional; with none the defaults reproduce
/// the plain interactive program.
#[derive(Debug, Parser)]
#[command(name = "ytgrab")]
#[command(about = "ytgrab: paste video URLs, download the best progressive stream", long_about = None)]
pub struct Cli {
    /// Directory downloaded videos are saved into (created if missing).
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Attempts per video before giving up (including the first).
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub max_attempts: u32,

    /// Pause between attempts, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 2.0)]
    pub retry_delay_secs: f64,

    /// Only retry failures that look transient (network trouble, 5xx, 429).
    #[arg(long)]
    pub transient_only: bool,

    /// Extractor program used to resolve URLs.
    #[arg(long = "yt-dlp", value_name = "PROGRAM", default_value = "yt-dlp")]
    pub ytdlp: PathBuf,

    /// Argument passed to the extractor before ours; repeatable (e.g. `--yt-dlp python3 --yt-dlp-arg=-m --yt-dlp-arg=yt_dlp`).
    #[arg(long = "yt-dlp-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub ytdlp_args: Vec<String>,
}

impl Cli {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            output_dir: self.output_dir.clone(),
            retry: RetryConfig {
                max_attempts: self.max_attempts,
                pause_secs: self.retry_delay_secs,
                transient_only: self.transient_only,
            },
            extractor: ExtractorConfig {
                program: self.ytdlp.clone(),
                args: self.ytdlp_args.clone(),
            },
        }
    }

    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = cli.session_config();
        tracing::debug!("session config: {:?}", cfg);

        let service = YtDlp::from_config(&cfg.extractor);
        let reporter = ConsoleReporter::new();
        let session = Session::new(&service, &cfg, ThreadPause, &reporter);

        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
        let stats = session.run(&mut prompter).context("terminal I/O failed")?;
        tracing::info!(
            batches = stats.batches,
            completed = stats.completed,
            failed = stats.failed,
            "session finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests;
