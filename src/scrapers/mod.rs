pub mod extract;
pub mod mobile_bg;
pub mod traits;
pub mod types;

pub use extract::{extract_page, listing_id_from_href, ListingExtractor};
pub use mobile_bg::MobileBgSource;
pub use traits::ListingSource;
pub use types::SourceParams;
