//! Search-term history: a durable, case-insensitively deduplicated log of
//! every distinct term users searched for.

use crate::models::SearchQuery;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for HistoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for HistoryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait SearchHistoryService: Send + Sync {
    /// Whether a term equal to `term` ignoring case (and surrounding
    /// whitespace) has been recorded.
    async fn exists(&self, term: &str) -> Result<bool, HistoryError>;

    /// Records `term` unless an equal one exists. Atomic: of any number of
    /// concurrent calls for the same term, at most one returns `true`.
    async fn append(&self, term: &str, searched_at: DateTime<Utc>) -> Result<bool, HistoryError>;

    /// Every recorded term, newest first, ties in insertion order.
    async fn list_all(&self) -> Result<Vec<SearchQuery>, HistoryError>;

    /// Administrative reset. Returns the number of removed entries.
    async fn clear(&self) -> Result<u64, HistoryError>;
}
