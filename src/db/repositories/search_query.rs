use crate::domain::SearchQueryId;
use crate::entities::{prelude::*, search_queries};
use crate::models::search_query::{encode_search_time, query_key};
use crate::models::SearchQuery;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

pub struct SearchQueryRepository {
    conn: DatabaseConnection,
}

impl SearchQueryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts the term unless a case-insensitively equal one already exists.
    ///
    /// Returns `true` when a row was created. The check and the insert are a
    /// single statement, so concurrent callers cannot both succeed.
    pub async fn insert_if_absent(&self, term: &str, searched_at: DateTime<Utc>) -> Result<bool> {
        let active_model = search_queries::ActiveModel {
            query_text: Set(term.trim().to_string()),
            query_key: Set(query_key(term)),
            search_time: Set(encode_search_time(searched_at)),
            ..Default::default()
        };

        let inserted = SearchQueries::insert(active_model)
            .on_conflict(
                OnConflict::column(search_queries::Column::QueryKey)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(inserted > 0)
    }

    pub async fn exists(&self, term: &str) -> Result<bool> {
        let count = SearchQueries::find()
            .filter(search_queries::Column::QueryKey.eq(query_key(term)))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    /// Most recent first; equal timestamps keep insertion order.
    pub async fn list_all(&self) -> Result<Vec<SearchQuery>> {
        let rows = SearchQueries::find()
            .order_by_desc(search_queries::Column::SearchTime)
            .order_by_asc(search_queries::Column::Id)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::to_domain).collect()
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(SearchQueries::find().count(&self.conn).await?)
    }

    pub async fn clear(&self) -> Result<u64> {
        let result = SearchQueries::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }

    fn to_domain(row: search_queries::Model) -> Result<SearchQuery> {
        let search_time = DateTime::parse_from_rfc3339(&row.search_time)
            .with_context(|| format!("Invalid search_time for query {}", row.id))?
            .with_timezone(&Utc);

        Ok(SearchQuery {
            id: SearchQueryId::new(row.id),
            query_text: row.query_text,
            search_time,
        })
    }
}
