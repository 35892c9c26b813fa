use crate::models::SearchQuery;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn search_query_repo(&self) -> repositories::search_query::SearchQueryRepository {
        repositories::search_query::SearchQueryRepository::new(self.conn.clone())
    }

    pub async fn record_search_query(&self, term: &str, searched_at: DateTime<Utc>) -> Result<bool> {
        self.search_query_repo()
            .insert_if_absent(term, searched_at)
            .await
    }

    pub async fn search_query_exists(&self, term: &str) -> Result<bool> {
        self.search_query_repo().exists(term).await
    }

    pub async fn list_search_queries(&self) -> Result<Vec<SearchQuery>> {
        self.search_query_repo().list_all().await
    }

    pub async fn search_query_count(&self) -> Result<u64> {
        self.search_query_repo().count().await
    }

    pub async fn clear_search_queries(&self) -> Result<u64> {
        self.search_query_repo().clear().await
    }
}
