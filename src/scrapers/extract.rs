use crate::error::{Result, ScoutError};
use crate::models::{ListingRecord, PRICE_NOT_AVAILABLE};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Class marking editorial/news cards mixed into the results list
const NON_LISTING_CLASS: &str = "fakti";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScoutError::Extraction(format!("invalid selector {css:?}: {e:?}")))
}

/// Turns a parsed search results page into listing records
pub struct ListingExtractor {
    item: Selector,
    title_link: Selector,
    price: Selector,
    price_inner: Selector,
    image: Selector,
}

impl ListingExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            item: selector("div.item")?,
            title_link: selector("a.title")?,
            price: selector("div.price")?,
            price_inner: selector("div")?,
            image: selector("img")?,
        })
    }

    /// Lazily extract candidates in document order.
    ///
    /// Non-listing cards are dropped silently. Each remaining card yields either
    /// a record or an `Extraction` error for that card alone.
    pub fn extract<'a>(
        &'a self,
        document: &'a Html,
    ) -> impl Iterator<Item = Result<ListingRecord>> + 'a {
        document
            .select(&self.item)
            .filter(|element| {
                let editorial = element.value().classes().any(|c| c == NON_LISTING_CLASS);
                if editorial {
                    debug!("Skipping non-listing card");
                }
                !editorial
            })
            .map(move |element| self.extract_one(element))
    }

    fn extract_one(&self, element: ElementRef<'_>) -> Result<ListingRecord> {
        let link = element
            .select(&self.title_link)
            .next()
            .ok_or_else(|| ScoutError::Extraction("listing link not found".to_string()))?;

        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| ScoutError::Extraction("listing link has no href".to_string()))?;

        let id = listing_id_from_href(href)?;
        let title = link.text().collect::<String>().trim().to_string();

        // Price lives in the first div nested under div.price
        let price = element
            .select(&self.price)
            .next()
            .and_then(|price_el| price_el.select(&self.price_inner).next())
            .map(|inner| inner.text().collect::<String>().trim().to_string())
            .unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string());

        let image_url = element
            .select(&self.image)
            .next()
            .and_then(|img| img.value().attr("src").or_else(|| img.value().attr("data-src")))
            .unwrap_or("");

        Ok(ListingRecord::new(id, title, price, href).with_image_url(image_url))
    }
}

/// Listing id is the second `-`-separated segment of the detail link,
/// e.g. `//www.mobile.bg/obiava-11718371858345931-bmw-240` -> `11718371858345931`.
pub fn listing_id_from_href(href: &str) -> Result<String> {
    let segment = href.split('-').nth(1).unwrap_or("");
    if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ScoutError::Extraction(format!(
            "unexpected listing link shape: {href:?}"
        )));
    }
    Ok(segment.to_string())
}

/// Parse a page and collect every candidate.
///
/// `Html` is not `Send`, so callers that hold results across `.await` points
/// should go through this instead of keeping the document alive.
pub fn extract_page(extractor: &ListingExtractor, html: &str) -> Vec<Result<ListingRecord>> {
    let document = Html::parse_document(html);
    extractor.extract(&document).collect()
}
