//! [`MediaService`] backed by the `yt-dlp` program.
//!
//! Metadata extraction and format discovery are delegated to
//! `yt-dlp --dump-single-json`; the chosen stream is then fetched directly
//! over HTTP by [`super::http::download_stream`].

use super::{default_filename, MediaError, MediaInfo, MediaService, Stream, TransferProgress};
use crate::config::ExtractorConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Seconds yt-dlp may wait on a socket before giving up.
const SOCKET_TIMEOUT_SECS: u32 = 30;

/// Runs `yt-dlp` (or a compatible program) to resolve media URLs.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    leading_args: Vec<String>,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn from_config(cfg: &ExtractorConfig) -> Self {
        Self::new(cfg.program.clone()).with_args(cfg.args.iter().cloned())
    }

    /// Arguments passed before ours (e.g. `-m yt_dlp` when the program is `python3`).
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    fn dump_json(&self, url: &str) -> Result<Vec<u8>, MediaError> {
        let timeout = SOCKET_TIMEOUT_SECS.to_string();
        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .args([
                "--dump-single-json",
                "--no-playlist",
                "--no-warnings",
                "--socket-timeout",
                timeout.as_str(),
                "--",
                url,
            ])
            .output()
            .map_err(|source| MediaError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(url, status = ?output.status, stderr = %stderr.trim(), "yt-dlp failed");
            return Err(classify_stderr(&stderr));
        }
        Ok(output.stdout)
    }
}

/// Rejects anything that is not an absolute http(s) URL before spawning the extractor.
fn precheck(url: &str) -> Result<(), MediaError> {
    let parsed =
        url::Url::parse(url).map_err(|e| MediaError::Malformed(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        _ => Err(MediaError::Malformed(url.to_string())),
    }
}

impl MediaService for YtDlp {
    fn resolve(&self, url: &str) -> Result<MediaInfo, MediaError> {
        precheck(url)?;
        let stdout = self.dump_json(url)?;
        parse_info(&stdout)
    }

    fn download(
        &self,
        stream: &Stream,
        output_dir: &Path,
        progress: &mut dyn FnMut(TransferProgress),
    ) -> Result<PathBuf, MediaError> {
        super::download_stream(stream, output_dir, progress)
    }
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(rename = "_type")]
    kind: Option<String>,
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    formats: Vec<RawFormat>,
    /// Single-format extractors put the format fields at the top level.
    #[serde(flatten)]
    top: RawFormat,
}

#[derive(Debug, Default, Deserialize)]
struct RawFormat {
    #[serde(default)]
    format_id: Option<String>,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    protocol: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
    #[serde(default)]
    tbr: Option<f64>,
    #[serde(default)]
    filesize: Option<u64>,
    #[serde(default)]
    filesize_approx: Option<u64>,
    #[serde(default)]
    http_headers: HashMap<String, String>,
}

/// Codec fields are absent for plain files; treat missing as present.
fn has_codec(codec: &Option<String>) -> bool {
    codec.as_deref().map_or(true, |c| c != "none")
}

impl RawFormat {
    /// Converts to a [`Stream`] when the format is a plain HTTP download.
    fn into_stream(self, title: &str, id: &str) -> Option<Stream> {
        let url = self.url?;
        let direct = match self.protocol.as_deref() {
            Some(p) => p == "https" || p == "http",
            None => url.starts_with("https://") || url.starts_with("http://"),
        };
        if !direct {
            return None;
        }
        let ext = self.ext.unwrap_or_else(|| "mp4".to_string());
        Some(Stream {
            format_id: self.format_id.unwrap_or_default(),
            default_filename: default_filename(title, id, &ext),
            ext,
            width: self.width,
            height: self.height,
            has_video: has_codec(&self.vcodec),
            has_audio: has_codec(&self.acodec),
            tbr: self.tbr,
            url,
            http_headers: self.http_headers,
            filesize: self.filesize.or(self.filesize_approx),
        })
    }
}

/// Parses `--dump-single-json` output into a [`MediaInfo`].
pub(crate) fn parse_info(stdout: &[u8]) -> Result<MediaInfo, MediaError> {
    let raw: RawInfo = serde_json::from_slice(stdout)?;
    if matches!(raw.kind.as_deref(), Some("playlist") | Some("multi_video")) {
        let name = if raw.title.is_empty() { raw.id } else { raw.title };
        return Err(MediaError::Playlist(name));
    }

    let RawInfo {
        id,
        title,
        formats,
        top,
        ..
    } = raw;

    let mut streams: Vec<Stream> = formats
        .into_iter()
        .filter_map(|f| f.into_stream(&title, &id))
        .collect();
    if streams.is_empty() {
        streams.extend(top.into_stream(&title, &id));
    }

    Ok(MediaInfo { id, title, streams })
}

/// Maps yt-dlp's stderr to a [`MediaError`].
///
/// yt-dlp has no machine-readable error channel, so this matches on the
/// message texts its extractors print.
pub fn classify_stderr(stderr: &str) -> MediaError {
    let message = stderr
        .lines()
        .rev()
        .find(|l| l.contains("ERROR"))
        .or_else(|| stderr.lines().rev().find(|l| !l.trim().is_empty()))
        .unwrap_or("yt-dlp exited with an error")
        .trim()
        .to_string();
    let lower = message.to_lowercase();

    if lower.contains("unsupported url") || lower.contains("is not a valid url") {
        return MediaError::Malformed(message);
    }
    if lower.contains("private video")
        || lower.contains("sign in to confirm your age")
        || lower.contains("age-restricted")
        || lower.contains("members-only")
        || lower.contains("join this channel")
        || lower.contains("not available in your country")
    {
        return MediaError::Denied(message);
    }
    if lower.contains("video unavailable")
        || lower.contains("has been removed")
        || lower.contains("does not exist")
        || lower.contains("incomplete youtube id")
    {
        return MediaError::NotFound(message);
    }
    if let Some(code) = http_status(&lower) {
        return MediaError::Http(code);
    }
    if lower.contains("timed out")
        || lower.contains("connection reset")
        || lower.contains("connection refused")
        || lower.contains("name resolution")
        || lower.contains("network is unreachable")
        || lower.contains("unable to download webpage")
    {
        return MediaError::Network(message);
    }
    MediaError::Other(message)
}

/// Extracts `NNN` from "http error NNN" (input already lower-cased).
fn http_status(lower: &str) -> Option<u32> {
    let rest = &lower[lower.find("http error ")? + "http error ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEO_JSON: &str = r#"{
        "id": "dQw4w9WgXcQ",
        "title": "Never Gonna Give You Up",
        "formats": [
            {"format_id": "140", "ext": "m4a", "protocol": "https", "url": "https://cdn.example.com/140",
             "vcodec": "none", "acodec": "mp4a.40.2", "tbr": 129.5},
            {"format_id": "18", "ext": "mp4", "protocol": "https", "url": "https://cdn.example.com/18",
             "width": 640, "height": 360, "vcodec": "avc1", "acodec": "mp4a", "tbr": 500.0, "filesize": 1000},
            {"format_id": "22", "ext": "mp4", "protocol": "https", "url": "https://cdn.example.com/22",
             "width": 1280, "height": 720, "vcodec": "avc1", "acodec": "mp4a", "tbr": 1500.0,
             "filesize_approx": 5000, "http_headers": {"User-Agent": "Mozilla/5.0"}},
            {"format_id": "hls-1080", "ext": "mp4", "protocol": "m3u8_native", "url": "https://cdn.example.com/x.m3u8",
             "height": 1080, "vcodec": "avc1", "acodec": "mp4a"}
        ]
    }"#;

    #[test]
    fn parses_formats_and_skips_non_http_protocols() {
        let info = parse_info(VIDEO_JSON.as_bytes()).unwrap();
        assert_eq!(info.id, "dQw4w9WgXcQ");
        assert_eq!(info.title, "Never Gonna Give You Up");
        assert_eq!(info.streams.len(), 3);
        let best = info.highest_resolution_stream().unwrap();
        assert_eq!(best.format_id, "22");
        assert_eq!(best.default_filename, "Never Gonna Give You Up.mp4");
        assert_eq!(best.filesize, Some(5000));
        assert_eq!(best.http_headers.get("User-Agent").unwrap(), "Mozilla/5.0");
    }

    #[test]
    fn single_format_at_top_level() {
        let json = r#"{"id": "clip", "title": "Clip", "ext": "webm",
                       "url": "https://files.example.com/clip.webm", "protocol": "https"}"#;
        let info = parse_info(json.as_bytes()).unwrap();
        assert_eq!(info.streams.len(), 1);
        let s = info.highest_resolution_stream().unwrap();
        assert!(s.is_progressive());
        assert_eq!(s.default_filename, "Clip.webm");
    }

    #[test]
    fn playlist_is_rejected() {
        let json = r#"{"_type": "playlist", "id": "PL1", "title": "Mix", "entries": []}"#;
        assert!(matches!(
            parse_info(json.as_bytes()),
            Err(MediaError::Playlist(name)) if name == "Mix"
        ));
    }

    #[test]
    fn garbage_is_parse_error() {
        assert!(matches!(parse_info(b"not json"), Err(MediaError::Parse(_))));
    }

    #[test]
    fn precheck_rejects_non_urls() {
        assert!(matches!(precheck("badurl"), Err(MediaError::Malformed(_))));
        assert!(matches!(precheck("ftp://example.com/a"), Err(MediaError::Malformed(_))));
        assert!(precheck("https://www.youtube.com/watch?v=dQw4w9WgXcQ").is_ok());
    }

    #[test]
    fn malformed_url_never_spawns() {
        let service = YtDlp::new("/nonexistent/yt-dlp");
        assert!(matches!(
            service.resolve("not a url"),
            Err(MediaError::Malformed(_))
        ));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let service = YtDlp::new("/nonexistent/yt-dlp");
        assert!(matches!(
            service.resolve("https://www.youtube.com/watch?v=x"),
            Err(MediaError::Spawn { .. })
        ));
    }

    #[test]
    fn stderr_classification() {
        assert!(matches!(
            classify_stderr("ERROR: [youtube] abc: Private video. Sign in if you've been granted access"),
            MediaError::Denied(_)
        ));
        assert!(matches!(
            classify_stderr("ERROR: [youtube] abc: Sign in to confirm your age."),
            MediaError::Denied(_)
        ));
        assert!(matches!(
            classify_stderr("ERROR: [youtube] abc: Video unavailable"),
            MediaError::NotFound(_)
        ));
        assert!(matches!(
            classify_stderr("ERROR: Unsupported URL: https://example.com/"),
            MediaError::Malformed(_)
        ));
        assert!(matches!(
            classify_stderr("ERROR: unable to download video data: HTTP Error 403: Forbidden"),
            MediaError::Http(403)
        ));
        assert!(matches!(
            classify_stderr("ERROR: [youtube] abc: Unable to download webpage: <urlopen error timed out>"),
            MediaError::Network(_)
        ));
        assert!(matches!(classify_stderr("something odd"), MediaError::Other(_)));
        assert!(matches!(classify_stderr(""), MediaError::Other(_)));
    }

    #[test]
    fn last_error_line_wins() {
        let stderr = "WARNING: something\nERROR: [youtube] abc: Video unavailable\n";
        match classify_stderr(stderr) {
            MediaError::NotFound(msg) => assert!(msg.starts_with("ERROR")),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
