use super::history_service::{HistoryError, SearchHistoryService};
use crate::db::Store;
use crate::models::SearchQuery;
use chrono::{DateTime, Utc};
use tracing::debug;

pub struct SeaOrmHistoryService {
    store: Store,
}

impl SeaOrmHistoryService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl SearchHistoryService for SeaOrmHistoryService {
    async fn exists(&self, term: &str) -> Result<bool, HistoryError> {
        Ok(self.store.search_query_exists(term).await?)
    }

    async fn append(&self, term: &str, searched_at: DateTime<Utc>) -> Result<bool, HistoryError> {
        let created = self.store.record_search_query(term, searched_at).await?;
        if created {
            debug!("Recorded new search term '{}'", term.trim());
        }
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<SearchQuery>, HistoryError> {
        Ok(self.store.list_search_queries().await?)
    }

    async fn clear(&self) -> Result<u64, HistoryError> {
        Ok(self.store.clear_search_queries().await?)
    }
}
