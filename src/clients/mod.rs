pub mod flickr;

use crate::domain::SortOrder;
use crate::models::PhotoRecord;

pub use flickr::{FlickrClient, ProviderError, ProviderErrorKind};

/// Upstream photo source.
///
/// Implementations attach their own credentials and classify failures into
/// [`ProviderError`]; callers never see transport details.
#[async_trait::async_trait]
pub trait PhotoProvider: Send + Sync {
    /// Keyword search, one page at a time.
    async fn search_photos(
        &self,
        term: &str,
        page: u32,
        sort: SortOrder,
    ) -> Result<Vec<PhotoRecord>, ProviderError>;

    /// Most recent public uploads, used when there is no search term.
    async fn get_recent_photos(
        &self,
        page: u32,
        sort: SortOrder,
    ) -> Result<Vec<PhotoRecord>, ProviderError>;
}
