//! Infinite-scroll gallery driver.
//!
//! [`FetchLoop`] keeps at most one request in flight, enforces an absolute
//! deadline on it and feeds results into a [`SessionState`].

pub mod fetcher;
pub mod session;

pub use fetcher::{FetchError, HttpPhotoFetcher, PhotoFetcher, render_error_text};
pub use session::{
    FetchOutcome, FetchStatus, PageRequest, PageResult, RECENT_MODE_NOTE, SessionState,
    TIMEOUT_MESSAGE, Ticket, Tile, Trigger,
};

use crate::models::SearchQuery;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Scroll metrics of the gallery container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    pub scroll_top: u32,
    pub client_height: u32,
    pub scroll_height: u32,
}

/// True when the visible window reaches within `threshold` of the bottom.
#[must_use]
pub const fn near_bottom(position: ScrollPosition, threshold: u32) -> bool {
    position.scroll_top.saturating_add(position.client_height)
        >= position.scroll_height.saturating_sub(threshold)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A request was already in flight.
    Dropped,
    /// Scroll event that did not reach the threshold.
    Ignored,
    Completed(FetchOutcome),
    /// The result arrived for a request the session no longer waits for.
    Stale,
}

pub struct FetchLoop {
    fetcher: Arc<dyn PhotoFetcher>,
    session: Mutex<SessionState>,
    history: Mutex<Vec<SearchQuery>>,
    timeout: Duration,
    scroll_threshold: u32,
}

impl FetchLoop {
    #[must_use]
    pub fn new(fetcher: Arc<dyn PhotoFetcher>, timeout: Duration, scroll_threshold: u32) -> Self {
        Self {
            fetcher,
            session: Mutex::new(SessionState::new()),
            history: Mutex::new(Vec::new()),
            timeout,
            scroll_threshold,
        }
    }

    pub async fn dispatch(&self, trigger: Trigger) -> Dispatch {
        let fresh_search = matches!(trigger, Trigger::Search { .. });

        let Some(request) = self.session.lock().await.begin(trigger) else {
            debug!("Request already in flight, trigger dropped");
            return Dispatch::Dropped;
        };

        debug!(
            "Fetching page {} (term {:?}, sort {})",
            request.page, request.term, request.sort
        );

        // Dropping the future on expiry aborts the HTTP request.
        let fetch = self
            .fetcher
            .fetch_page(request.term.as_deref(), request.page, request.sort);
        let result = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(photos)) => PageResult::Photos(photos),
            Ok(Err(e)) => {
                warn!("Photo request failed: {}", e);
                PageResult::Failed(e.display_message())
            }
            Err(_) => {
                warn!("Photo request timed out after {:?}", self.timeout);
                PageResult::TimedOut
            }
        };

        let outcome = {
            let mut session = self.session.lock().await;
            if session.finish(request.ticket, result) {
                session.last_outcome().cloned()
            } else {
                None
            }
        };

        if fresh_search {
            self.refresh_history().await;
        }

        outcome.map_or(Dispatch::Stale, Dispatch::Completed)
    }

    /// Issues a scroll trigger when the position is near the bottom.
    pub async fn on_scroll(&self, position: ScrollPosition) -> Dispatch {
        if !near_bottom(position, self.scroll_threshold) {
            return Dispatch::Ignored;
        }
        self.dispatch(Trigger::ScrollNearBottom).await
    }

    /// Re-reads the search history. A failed read keeps the previous list.
    pub async fn refresh_history(&self) {
        match self.fetcher.fetch_history().await {
            Ok(entries) => {
                info!("Search history refreshed ({} terms)", entries.len());
                *self.history.lock().await = entries;
            }
            Err(e) => warn!("Could not refresh search history: {}", e),
        }
    }

    /// Runs a fresh search for the history entry at `index`.
    pub async fn rerun_history(&self, index: usize) -> Option<Dispatch> {
        let term = self.history.lock().await.get(index)?.query_text.clone();
        let sort = self.session.lock().await.sort();
        Some(self.dispatch(Trigger::Search { term, sort }).await)
    }

    pub async fn snapshot(&self) -> SessionState {
        self.session.lock().await.clone()
    }

    pub async fn history(&self) -> Vec<SearchQuery> {
        self.history.lock().await.clone()
    }
}
