//! Blocking HTTP client for the search endpoint and the covers CDN.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use thiserror::Error;
use tracing::debug;

use super::model::{self, CoverSize, SearchResults};
use super::request::SearchRequest;

/// Everything that can go wrong with one search. All variants collapse into
/// the same failed phase and the same user-visible notification; none is
/// retried.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("search endpoint returned HTTP {0}")]
    Http(u16),
    #[error("malformed search response: {0}")]
    Parse(#[source] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(15),
            user_agent: format!("book-finder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub struct OpenLibraryClient {
    client: Client,
    options: ClientOptions,
}

impl OpenLibraryClient {
    pub fn new(options: ClientOptions) -> anyhow::Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        default_headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&options.user_agent)
                .unwrap_or(HeaderValue::from_static("book-finder")),
        );

        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self { client, options })
    }

    /// Issue exactly one GET for the given request and map the payload.
    /// Non-2xx statuses fail without body inspection.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResults, SearchError> {
        let url = request.url();
        debug!(target: "api", url = %url, "search request");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .map_err(SearchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http(status.as_u16()));
        }

        let payload = response.json().map_err(SearchError::Parse)?;
        Ok(model::map_response(payload))
    }

    /// Best-effort cover download for the TUI preview. The web UI lets the
    /// browser load covers directly, so failures here only mean "no preview".
    pub fn fetch_cover(&self, cover_id: u64, size: CoverSize) -> Option<Vec<u8>> {
        let url = model::cover_url(cover_id, size);
        debug!(target: "api", url = %url, "cover request");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("image/*"))
            .timeout(self.options.request_timeout)
            .send()
            .ok()?;
        let response = response.error_for_status().ok()?;
        let bytes = response.bytes().ok()?;
        if bytes.is_empty() {
            return None;
        }
        Some(bytes.to_vec())
    }
}
