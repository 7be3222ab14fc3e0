//! File names for downloaded videos.

/// Linux NAME_MAX, in bytes.
const NAME_MAX: usize = 255;

/// Fallback stem when neither title nor id yields anything usable.
const DEFAULT_STEM: &str = "video";

/// Turns a video title into a file stem safe on Linux, macOS and Windows.
///
/// - Drops `/ \ : * ? " < > |`, NUL, and control characters
/// - Collapses runs of whitespace into one space
/// - Trims leading/trailing spaces and dots
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_space = false;

    for c in title.chars() {
        if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c == '\0' {
            continue;
        }
        if c.is_whitespace() || c.is_control() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }

    out.trim_matches(|c| c == ' ' || c == '.').to_string()
}

/// `<sanitized title>.<ext>`, limited to NAME_MAX bytes.
///
/// Falls back to the video id and then to `video` when the title sanitizes to nothing.
pub fn default_filename(title: &str, id: &str, ext: &str) -> String {
    let stem = [title, id]
        .iter()
        .map(|s| sanitize_title(s))
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STEM.to_string());

    let ext = sanitize_title(ext);
    let suffix_len = if ext.is_empty() { 0 } else { ext.len() + 1 };
    let budget = NAME_MAX.saturating_sub(suffix_len);

    let mut take = stem.len().min(budget);
    while take > 0 && !stem.is_char_boundary(take) {
        take -= 1;
    }
    let stem = stem[..take].trim_end_matches([' ', '.']);

    if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, ext)
    }
}
