//! HTTP(S) transport built on the hyper legacy client.

use std::time::Duration;

use bytes::Bytes;
use http::header::USER_AGENT;
use http::{Method, Request, StatusCode, Uri};
use http_body_util::Empty;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::fetch::{Fetch, FetchError};

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT_VALUE: &str = concat!("pulse/", env!("CARGO_PKG_VERSION"));

/// GETs `http://` and `https://` URLs with a bounded wait per request.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<StatusCode, FetchError> {
        let uri: Uri = url
            .parse()
            .map_err(|e: http::uri::InvalidUri| FetchError::InvalidUrl(e.to_string()))?;
        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(FetchError::InvalidUrl(format!(
                "{url}: expected an absolute http(s) url"
            )));
        }

        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .body(Empty::<Bytes>::new())
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        match tokio::time::timeout(self.timeout, self.client.request(req)).await {
            Ok(Ok(resp)) => {
                debug!(%url, status = %resp.status(), "response received");
                Ok(resp.status())
            }
            Ok(Err(e)) => {
                debug!(%url, error = %e, "request failed");
                Err(FetchError::Transport(error_chain(&e)))
            }
            Err(_) => {
                debug!(%url, timeout = ?self.timeout, "request timed out");
                Err(FetchError::Timeout(self.timeout))
            }
        }
    }
}

/// The legacy client wraps the interesting cause (DNS, refused, TLS), so
/// flatten the source chain into one line.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
