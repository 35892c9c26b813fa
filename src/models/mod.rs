pub mod photo;
pub mod search_query;

pub use photo::PhotoRecord;
pub use search_query::SearchQuery;
