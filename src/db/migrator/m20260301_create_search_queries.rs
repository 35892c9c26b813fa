use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SearchQueries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchQueries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SearchQueries::QueryText).string().not_null())
                    .col(ColumnDef::new(SearchQueries::QueryKey).string().not_null())
                    .col(ColumnDef::new(SearchQueries::SearchTime).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Dedup relies on this index: inserts use ON CONFLICT(query_key) DO NOTHING.
        manager
            .create_index(
                Index::create()
                    .name("idx_search_queries_query_key_unique")
                    .table(SearchQueries::Table)
                    .col(SearchQueries::QueryKey)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_search_queries_search_time")
                    .table(SearchQueries::Table)
                    .col(SearchQueries::SearchTime)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchQueries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SearchQueries {
    Table,
    Id,
    QueryText,
    QueryKey,
    SearchTime,
}
