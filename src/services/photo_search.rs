//! Search orchestration: record the term, pick recent or keyword mode, call the
//! provider, hand back its photos untouched.

use crate::clients::{PhotoProvider, ProviderError};
use crate::domain::{SearchMode, SortOrder};
use crate::models::PhotoRecord;
use crate::services::SearchHistoryService;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Photo {mode} failed on page {page}: {source}")]
    Provider {
        mode: &'static str,
        page: u32,
        #[source]
        source: ProviderError,
    },
}

impl SearchError {
    #[must_use]
    pub const fn provider_error(&self) -> &ProviderError {
        match self {
            Self::Provider { source, .. } => source,
        }
    }
}

pub struct PhotoSearchService {
    history: Arc<dyn SearchHistoryService>,
    provider: Arc<dyn PhotoProvider>,
}

impl PhotoSearchService {
    #[must_use]
    pub fn new(history: Arc<dyn SearchHistoryService>, provider: Arc<dyn PhotoProvider>) -> Self {
        Self { history, provider }
    }

    /// Runs one search request.
    ///
    /// A usable term is written to the history before the provider is called,
    /// so the history reflects what users asked for even when Flickr fails. A
    /// history write failure is logged and does not fail the search.
    pub async fn search(
        &self,
        search_term: Option<&str>,
        page: u32,
        sort: SortOrder,
    ) -> Result<Vec<PhotoRecord>, SearchError> {
        let mode = SearchMode::from_raw(search_term);

        if let SearchMode::Keyword(term) = &mode {
            self.record_history(term).await;
        }

        metrics::counter!("photo_search_total", "mode" => mode.label()).increment(1);
        debug!("Dispatching {} request (page {}, sort {})", mode.label(), page, sort);

        let result = match &mode {
            SearchMode::Recent => self.provider.get_recent_photos(page, sort).await,
            SearchMode::Keyword(term) => self.provider.search_photos(term, page, sort).await,
        };

        result.map_err(|source| {
            error!(
                "Failed to search photos with term {:?} and page {}: {}",
                mode.term().unwrap_or_default(),
                page,
                source
            );
            metrics::counter!("provider_errors_total", "kind" => source.kind().as_str())
                .increment(1);
            SearchError::Provider {
                mode: mode.label(),
                page,
                source,
            }
        })
    }

    async fn record_history(&self, term: &str) {
        if let Err(e) = self.history.append(term, Utc::now()).await {
            warn!("Could not record search term '{}': {}", term.trim(), e);
        }
    }
}
