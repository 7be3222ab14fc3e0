//! Single-stream HTTP GET of a resolved media stream.
//!
//! Writes the response body sequentially to `<final>.part`, then renames it
//! into place once the transfer completed with a 2xx status.

use super::{MediaError, Stream, TransferProgress};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Temporary file suffix used before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.mp4` → `a.mp4.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Downloads `stream` into `output_dir/<stream.default_filename>`.
///
/// Creates `output_dir` if needed. `progress` is called as bytes arrive.
/// Returns the final path. On failure the partial file is removed.
pub fn download_stream(
    stream: &Stream,
    output_dir: &Path,
    progress: &mut dyn FnMut(TransferProgress),
) -> Result<PathBuf, MediaError> {
    fs::create_dir_all(output_dir)?;
    let final_path = output_dir.join(&stream.default_filename);
    let part_path = temp_path(&final_path);

    match transfer(stream, &part_path, progress) {
        Ok(bytes) => {
            fs::rename(&part_path, &final_path)?;
            tracing::debug!(path = %final_path.display(), bytes, "stream saved");
            Ok(final_path)
        }
        Err(e) => {
            let _ = fs::remove_file(&part_path);
            Err(e)
        }
    }
}

fn transfer(
    stream: &Stream,
    part_path: &Path,
    progress: &mut dyn FnMut(TransferProgress),
) -> Result<u64, MediaError> {
    let mut out = BufWriter::new(File::create(part_path)?);
    let mut written = 0u64;
    let mut write_err: Option<std::io::Error> = None;
    let announced = stream.filesize;

    let mut easy = curl::easy::Easy::new();
    easy.url(&stream.url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.fail_on_error(true)?;
    easy.progress(true)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;

    let mut list = curl::easy::List::new();
    for (k, v) in &stream.http_headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    if !stream.http_headers.is_empty() {
        easy.http_headers(list)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match out.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                tracing::warn!("stream write failed: {}", e);
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.progress_function(|dltotal, dlnow, _, _| {
            let total = if dltotal > 0.0 {
                Some(dltotal as u64)
            } else {
                announced
            };
            progress(TransferProgress {
                bytes_done: dlnow as u64,
                total_bytes: total,
            });
            true
        })?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(MediaError::Io(e));
    }
    if let Err(e) = performed {
        if e.is_http_returned_error() {
            let code = easy.response_code()?;
            return Err(MediaError::Http(code));
        }
        return Err(MediaError::Curl(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(MediaError::Http(code));
    }

    out.flush()?;
    progress(TransferProgress {
        bytes_done: written,
        total_bytes: Some(written),
    });
    Ok(written)
}
