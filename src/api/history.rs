use axum::extract::State;
use std::sync::Arc;

use super::{ApiError, AppState, Utf8Json};

/// Every distinct term ever searched, newest first.
pub async fn show_history(State(state): State<Arc<AppState>>) -> Result<Utf8Json, ApiError> {
    let queries = state.history().list_all().await?;
    Utf8Json::from_value(&queries)
}
