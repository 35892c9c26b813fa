pub use super::search_queries::Entity as SearchQueries;
