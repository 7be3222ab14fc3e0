//! Stream selection: highest resolution among progressive streams.

use super::Stream;
use std::cmp::Ordering;

/// Picks the progressive stream with the greatest height.
///
/// Ties go to mp4, then to the higher total bitrate. Streams without audio or
/// video are never chosen, since saving them would need a separate mux step.
pub fn highest_resolution(streams: &[Stream]) -> Option<&Stream> {
    streams
        .iter()
        .filter(|s| s.is_progressive())
        .max_by(|a, b| compare(a, b))
}

fn compare(a: &Stream, b: &Stream) -> Ordering {
    a.height
        .unwrap_or(0)
        .cmp(&b.height.unwrap_or(0))
        .then_with(|| (a.ext == "mp4").cmp(&(b.ext == "mp4")))
        .then_with(|| {
            a.tbr
                .unwrap_or(0.0)
                .partial_cmp(&b.tbr.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal)
        })
}
