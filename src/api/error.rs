use axum::{
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::clients::{ProviderError, ProviderErrorKind};
use crate::services::{HistoryError, SearchError};

pub const SENTINEL_START: &str = "Start";
pub const SENTINEL_END: &str = "End";

/// Machine-readable error class, sent alongside the sentinel body.
pub const ERROR_KIND_HEADER: &str = "x-error-kind";

/// Wraps a message in the `Start ... End` envelope the browser client parses.
///
/// The message is HTML-escaped because the client inserts it as markup, and
/// every line break becomes `<br>`.
#[must_use]
pub fn wrap_sentinel(message: &str) -> String {
    let escaped = html_escape::encode_text(message);
    format!("{SENTINEL_START}\n Oops! \n {escaped} \n {SENTINEL_END}")
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

/// Returns the text between the first `Start` and the following `End`.
///
/// A body with no `Start` marker yields `None`; a missing `End` yields the
/// rest of the body.
#[must_use]
pub fn extract_sentinel(body: &str) -> Option<&str> {
    let (_, rest) = body.split_once(SENTINEL_START)?;
    Some(rest.split_once(SENTINEL_END).map_or(rest, |(inner, _)| inner))
}

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    Upstream {
        kind: ProviderErrorKind,
        message: String,
    },

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::Upstream { message, .. } => write!(f, "Upstream error: {message}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Upstream {
                kind: ProviderErrorKind::Timeout,
                ..
            } => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "validation",
            Self::Upstream { kind, .. } => kind.as_str(),
            Self::DatabaseError(_) => "database",
            Self::InternalError(_) => "internal",
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    fn user_message(&self) -> String {
        match self {
            Self::ValidationError(msg) | Self::Upstream { message: msg, .. } => msg.clone(),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                "A database error occurred".to_string()
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = wrap_sentinel(&self.user_message());

        (
            status,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                ),
                (
                    HeaderName::from_static(ERROR_KIND_HEADER),
                    HeaderValue::from_static(self.kind()),
                ),
            ],
            body,
        )
            .into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        Self::Upstream {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Provider { source, .. } => source.into(),
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}
