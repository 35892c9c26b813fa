pub mod search_query;
