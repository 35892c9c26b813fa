pub mod history_service;
pub mod history_service_impl;
pub use history_service::{HistoryError, SearchHistoryService};
pub use history_service_impl::SeaOrmHistoryService;

pub mod photo_search;
pub use photo_search::{PhotoSearchService, SearchError};
