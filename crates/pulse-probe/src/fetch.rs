//! The transport seam between retry logic and HTTP.

use std::future::Future;
use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

/// Why a single GET produced no status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Performs one HTTP GET and reports the response status.
pub trait Fetch {
    fn get(&self, url: &str) -> impl Future<Output = Result<StatusCode, FetchError>>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn get(&self, url: &str) -> impl Future<Output = Result<StatusCode, FetchError>> {
        (**self).get(url)
    }
}
