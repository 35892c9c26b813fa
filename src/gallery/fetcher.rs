use crate::api::{PhotoDto, extract_sentinel};
use crate::domain::{RECENT_SENTINEL, SortOrder};
use crate::models::SearchQuery;
use anyhow::Context;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Non-2xx answer; `body` is the raw response text.
    #[error("Server answered HTTP {status}")]
    Rejected { status: u16, body: String },

    #[error("Could not reach the server: {0}")]
    Transport(String),

    #[error("The server sent an unreadable response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Text to show the user.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Rejected { body, .. } => {
                render_error_text(extract_sentinel(body).unwrap_or(body))
            }
            other => other.to_string(),
        }
    }
}

/// Turns a sentinel payload (`<br>`-separated, HTML-escaped) into plain lines.
#[must_use]
pub fn render_error_text(fragment: &str) -> String {
    let unbroken = fragment.replace("<br>", "\n");
    html_escape::decode_html_entities(&unbroken)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Transport used by the fetch loop.
#[async_trait::async_trait]
pub trait PhotoFetcher: Send + Sync {
    /// One page of photos. `term` is `None` for recent mode.
    async fn fetch_page(
        &self,
        term: Option<&str>,
        page: u32,
        sort: SortOrder,
    ) -> Result<Vec<PhotoDto>, FetchError>;

    async fn fetch_history(&self) -> Result<Vec<SearchQuery>, FetchError>;
}

/// Talks to a running photoscroll server.
pub struct HttpPhotoFetcher {
    client: Client,
    server_url: String,
}

impl HttpPhotoFetcher {
    /// No client-level timeout: the fetch loop enforces its own deadline.
    pub fn new(server_url: &str) -> anyhow::Result<Self> {
        url::Url::parse(server_url).with_context(|| format!("Invalid server URL: {server_url}"))?;

        let client = Client::builder()
            .user_agent(concat!("Photoscroll/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_client(client, server_url))
    }

    #[must_use]
    pub fn with_client(client: Client, server_url: &str) -> Self {
        Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn search_url(&self, term: Option<&str>, page: u32, sort: SortOrder) -> String {
        format!(
            "{}/api/photos/search?searchTerm={}&page={}&sort={}",
            self.server_url,
            urlencoding::encode(term.unwrap_or(RECENT_SENTINEL)),
            page,
            urlencoding::encode(sort.as_str())
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl PhotoFetcher for HttpPhotoFetcher {
    async fn fetch_page(
        &self,
        term: Option<&str>,
        page: u32,
        sort: SortOrder,
    ) -> Result<Vec<PhotoDto>, FetchError> {
        let url = self.search_url(term, page, sort);
        self.get_json(&url).await
    }

    async fn fetch_history(&self) -> Result<Vec<SearchQuery>, FetchError> {
        let url = format!("{}/api/searchHistory/show", self.server_url);
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::wrap_sentinel;

    #[test]
    fn search_url_encodes_term_and_uses_recent_sentinel() {
        let fetcher = HttpPhotoFetcher::with_client(Client::new(), "http://127.0.0.1:5000/");

        assert_eq!(
            fetcher.search_url(Some("red fox&cub"), 2, SortOrder::DateTaken),
            "http://127.0.0.1:5000/api/photos/search?searchTerm=red%20fox%26cub&page=2&sort=DateTaken"
        );
        assert_eq!(
            fetcher.search_url(None, 1, SortOrder::DateUploaded),
            "http://127.0.0.1:5000/api/photos/search?searchTerm=NULL&page=1&sort=DateUploaded"
        );
    }

    #[test]
    fn rejected_body_is_unwrapped() {
        let err = FetchError::Rejected {
            status: 502,
            body: wrap_sentinel("Flickr error 100: Invalid API Key"),
        };
        assert_eq!(
            err.display_message(),
            "Oops!\nFlickr error 100: Invalid API Key"
        );
    }

    #[test]
    fn rejected_body_without_markers_is_shown_as_is() {
        let err = FetchError::Rejected {
            status: 500,
            body: "Internal Server Error".to_string(),
        };
        assert_eq!(err.display_message(), "Internal Server Error");
    }

    #[test]
    fn escaped_markup_is_decoded_for_display() {
        assert_eq!(render_error_text("<br> a &lt;b&gt; <br> "), "a <b>");
    }
}
