//! Classify media errors, HTTP status and curl errors into retry policy error kinds.

use crate::media::MediaError;
use crate::retry::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        404 | 410 => ErrorKind::NotFound,
        _ => ErrorKind::Http(code),
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return ErrorKind::Malformed;
    }
    if e.is_operation_timedout()
        || e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
        || e.is_ssl_connect_error()
    {
        return ErrorKind::Transient;
    }
    ErrorKind::Other
}

/// Classify a media error into an ErrorKind.
pub fn classify(e: &MediaError) -> ErrorKind {
    match e {
        MediaError::Malformed(_) | MediaError::Playlist(_) => ErrorKind::Malformed,
        MediaError::NotFound(_) => ErrorKind::NotFound,
        MediaError::Denied(_) => ErrorKind::Denied,
        MediaError::Network(_) => ErrorKind::Transient,
        MediaError::Http(code) => classify_http_status(*code),
        MediaError::Curl(ce) => classify_curl_error(ce),
        MediaError::NoStream
        | MediaError::Spawn { .. }
        | MediaError::Parse(_)
        | MediaError::Io(_)
        | MediaError::Other(_) => ErrorKind::Other,
    }
}
