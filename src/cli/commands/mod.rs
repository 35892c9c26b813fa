mod browse;
mod history;
mod search;

pub use browse::cmd_browse;
pub use history::cmd_history;
pub use search::cmd_search_photos;
