use axum::extract::{Query, State, rejection::QueryRejection};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_page;
use super::{ApiError, AppState, PhotoDto, Utf8Json};
use crate::domain::SortOrder;

/// Raw query string of the search endpoint. Everything arrives as text so a
/// malformed `page` still gets the sentinel error body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoSearchQuery {
    pub search_term: Option<String>,
    pub page: Option<String>,
    pub sort: Option<String>,
}

pub async fn search_photos(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PhotoSearchQuery>, QueryRejection>,
) -> Result<Utf8Json, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::validation(format!("Invalid query string: {}", rejection.body_text()))
    })?;
    let page = validate_page(query.page.as_deref())?;
    let sort = SortOrder::parse_or_default(query.sort.as_deref());

    let photos = state
        .search_service()
        .search(query.search_term.as_deref(), page, sort)
        .await?;

    let dtos: Vec<PhotoDto> = photos.into_iter().map(PhotoDto::from).collect();
    Utf8Json::from_value(&dtos)
}
