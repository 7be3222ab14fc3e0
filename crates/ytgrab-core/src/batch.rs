//! URL validation and batch classification.
//!
//! A URL is valid when the media service can resolve it. Nothing is cached:
//! a URL that is later downloaded gets resolved again by the download.

use crate::media::MediaService;

/// URLs from one line of input, split by whether they resolved.
/// Both lists keep the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits a line of user input into URL tokens on whitespace.
pub fn split_urls(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// True if `service` can resolve `url`. Every kind of failure counts as invalid.
pub fn is_valid_url<S: MediaService + ?Sized>(service: &S, url: &str) -> bool {
    match service.resolve(url) {
        Ok(info) => {
            tracing::debug!(url, title = %info.title, "url is valid");
            true
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "url is invalid");
            false
        }
    }
}

/// Partitions `urls` into valid and invalid in one pass, validating each once.
pub fn classify_urls<S, I>(service: &S, urls: I) -> Batch
where
    S: MediaService + ?Sized,
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut batch = Batch::default();
    for url in urls {
        let url = url.into();
        if is_valid_url(service, &url) {
            batch.valid.push(url);
        } else {
            batch.invalid.push(url);
        }
    }
    tracing::info!(
        valid = batch.valid.len(),
        invalid = batch.invalid.len(),
        "classified batch"
    );
    batch
}
