use crate::error::Result;
use async_trait::async_trait;

/// Common trait for listing page sources
/// The pipeline only needs the raw markup; parsing happens in the extractor
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the raw HTML of the listing page
    async fn fetch_page(&self) -> Result<String>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
