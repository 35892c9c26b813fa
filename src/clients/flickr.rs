use crate::config::FlickrConfig;
use crate::domain::SortOrder;
use crate::models::PhotoRecord;
use anyhow::Context;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::PhotoProvider;

pub const FLICKR_REST_API: &str = "https://api.flickr.com/services/rest/";

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Failures talking to Flickr, one variant per failure class.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// DNS, connect, TLS, timeout or body read failure.
    #[error("Could not reach Flickr: {message}")]
    Transport { message: String, timed_out: bool },

    #[error("Flickr responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Flickr returned an unreadable response: {0}")]
    Malformed(String),

    /// Flickr answered `stat: fail` (bad key, bad parameters, rate limit).
    #[error("Flickr error {code}: {message}")]
    Api { code: i64, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Transport,
    Timeout,
    Status,
    Malformed,
    Api,
}

impl ProviderErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::Status => "upstream_status",
            Self::Malformed => "malformed_response",
            Self::Api => "provider_error",
        }
    }
}

impl ProviderError {
    #[must_use]
    pub const fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::Transport {
                timed_out: true, ..
            } => ProviderErrorKind::Timeout,
            Self::Transport { .. } => ProviderErrorKind::Transport,
            Self::Status { .. } => ProviderErrorKind::Status,
            Self::Malformed(_) => ProviderErrorKind::Malformed,
            Self::Api { .. } => ProviderErrorKind::Api,
        }
    }

    /// Only transport failures are retried; the request is an idempotent GET.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The request URL carries the API key, so it is stripped from the message.
    fn transport(err: reqwest::Error) -> Self {
        let timed_out = err.is_timeout();
        let err = err.without_url();

        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        Self::Transport { message, timed_out }
    }

    fn deadline_exceeded(deadline: Duration) -> Self {
        Self::Transport {
            message: format!("no answer within {}ms", deadline.as_millis()),
            timed_out: true,
        }
    }
}

/// API key and secret. The secret is only needed for signed calls, which the
/// public photo endpoints do not require.
#[derive(Clone)]
pub struct FlickrCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for FlickrCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlickrCredentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
            jitter_ms: 100,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter_ms: 0,
        }
    }

    /// Exponential backoff for the given zero-based retry, capped, plus jitter.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let backoff = self.base_delay.saturating_mul(factor).min(self.max_delay);
        if self.jitter_ms == 0 {
            return backoff;
        }
        let jitter = rand::rng().random_range(0..=self.jitter_ms);
        backoff.saturating_add(Duration::from_millis(jitter))
    }
}

#[derive(Deserialize)]
struct FlickrResponse {
    #[serde(default)]
    stat: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    photos: Option<FlickrPhotoPage>,
}

#[derive(Deserialize)]
struct FlickrPhotoPage {
    #[serde(default)]
    photo: Vec<FlickrPhoto>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct FlickrPhoto {
    #[serde(deserialize_with = "lenient_string")]
    id: String,
    #[serde(deserialize_with = "lenient_string")]
    owner: String,
    #[serde(deserialize_with = "lenient_string")]
    secret: String,
    #[serde(deserialize_with = "lenient_string")]
    server: String,
    #[serde(deserialize_with = "lenient_int")]
    farm: i64,
    #[serde(deserialize_with = "lenient_string")]
    title: String,
    #[serde(deserialize_with = "lenient_int")]
    ispublic: i64,
    #[serde(deserialize_with = "lenient_int")]
    isfriend: i64,
    #[serde(deserialize_with = "lenient_int")]
    isfamily: i64,
}

impl From<FlickrPhoto> for PhotoRecord {
    fn from(p: FlickrPhoto) -> Self {
        Self {
            id: p.id,
            owner: p.owner,
            secret: p.secret,
            server: p.server,
            farm: p.farm,
            title: p.title,
            is_public: flag(p.ispublic),
            is_friend: flag(p.isfriend),
            is_family: flag(p.isfamily),
        }
    }
}

fn flag(value: i64) -> i32 {
    i32::try_from(value).unwrap_or_default()
}

/// Flickr mixes string and numeric encodings between endpoints; null and
/// unexpected shapes become the empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_i64().unwrap_or_default(),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or_default(),
        serde_json::Value::Bool(b) => i64::from(b),
        _ => 0,
    })
}

/// Maps a raw Flickr REST body to photo records.
pub fn parse_photos_response(body: &str) -> Result<Vec<PhotoRecord>, ProviderError> {
    let response: FlickrResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    if response.stat == "fail" {
        return Err(ProviderError::Api {
            code: response.code.unwrap_or_default(),
            message: response
                .message
                .unwrap_or_else(|| "Unknown Flickr error".to_string()),
        });
    }

    match response.photos {
        Some(page) => Ok(page.photo.into_iter().map(PhotoRecord::from).collect()),
        None if response.stat == "ok" => Ok(Vec::new()),
        None => Err(ProviderError::Malformed(format!(
            "missing photos in response (stat: {:?})",
            response.stat
        ))),
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body.to_string()
    } else {
        let mut cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        cut.push('…');
        cut
    }
}

#[derive(Clone)]
pub struct FlickrClient {
    client: Client,
    base_url: Url,
    credentials: FlickrCredentials,
    per_page: u32,
    retry: RetryPolicy,
    deadline: Duration,
}

impl FlickrClient {
    pub fn with_shared_client(client: Client, config: &FlickrConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid Flickr base URL: {}", config.base_url))?;

        Ok(Self {
            client,
            base_url,
            credentials: FlickrCredentials {
                api_key: config.api_key.clone(),
                api_secret: config.api_secret.clone(),
            },
            per_page: config.per_page,
            retry: RetryPolicy {
                max_retries: config.max_retries,
                base_delay: Duration::from_millis(config.retry_base_delay_ms),
                max_delay: Duration::from_millis(config.retry_max_delay_ms),
                jitter_ms: config.retry_jitter_ms,
            },
            deadline: Duration::from_secs(config.total_timeout_seconds),
        })
    }

    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Caps the whole call, retries and backoff included.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    #[must_use]
    pub const fn credentials(&self) -> &FlickrCredentials {
        &self.credentials
    }

    fn build_url(&self, method: &str, text: Option<&str>, page: u32, sort: SortOrder) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("method", method)
                .append_pair("api_key", &self.credentials.api_key);
            if let Some(text) = text {
                pairs.append_pair("text", text);
            }
            pairs
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &self.per_page.to_string())
                .append_pair("sort", sort.provider_token())
                .append_pair("format", "json")
                .append_pair("nojsoncallback", "1");
        }
        url
    }

    async fn fetch_once(&self, url: Url) -> Result<Vec<PhotoRecord>, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ProviderError::transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(ProviderError::transport)?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        parse_photos_response(&body)
    }

    async fn call(
        &self,
        method: &str,
        text: Option<&str>,
        page: u32,
        sort: SortOrder,
    ) -> Result<Vec<PhotoRecord>, ProviderError> {
        let url = self.build_url(method, text, page, sort);
        debug!("Calling {} (page {}, sort {})", method, page, sort);

        tokio::time::timeout(self.deadline, self.call_with_retry(method, url))
            .await
            .unwrap_or_else(|_| {
                warn!("{} gave up after {}ms", method, self.deadline.as_millis());
                Err(ProviderError::deadline_exceeded(self.deadline))
            })
    }

    async fn call_with_retry(
        &self,
        method: &str,
        url: Url,
    ) -> Result<Vec<PhotoRecord>, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url.clone()).await {
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "{} failed ({}), retrying in {}ms ({}/{})",
                        method,
                        err,
                        delay.as_millis(),
                        attempt + 1,
                        self.retry.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[async_trait::async_trait]
impl PhotoProvider for FlickrClient {
    async fn search_photos(
        &self,
        term: &str,
        page: u32,
        sort: SortOrder,
    ) -> Result<Vec<PhotoRecord>, ProviderError> {
        self.call("flickr.photos.search", Some(term), page, sort)
            .await
    }

    async fn get_recent_photos(
        &self,
        page: u32,
        sort: SortOrder,
    ) -> Result<Vec<PhotoRecord>, ProviderError> {
        self.call("flickr.photos.getRecent", None, page, sort).await
    }
}
