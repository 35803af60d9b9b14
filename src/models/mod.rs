use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel price for listings whose card carries no price element
pub const PRICE_NOT_AVAILABLE: &str = "N/A";

/// A classifieds listing, either freshly extracted or read back from the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingRecord {
    pub id: String,
    pub title: String,
    pub price: String,
    pub url: String,
    /// Empty when the listing card has no image
    pub image_url: String,
    /// Set by the store when the record is first persisted
    pub added_at: Option<DateTime<Utc>>,
}

impl ListingRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price: price.into(),
            url: url.into(),
            image_url: String::new(),
            added_at: None,
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn has_price(&self) -> bool {
        self.price != PRICE_NOT_AVAILABLE
    }
}
