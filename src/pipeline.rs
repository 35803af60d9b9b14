use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::models::ListingRecord;
use crate::notify::{DispatchSummary, Notifier};
use crate::scrapers::{extract_page, ListingExtractor, ListingSource};
use crate::storage::{InsertOutcome, SeenStore};

/// Outcome of one ingestion pass
#[derive(Debug, Default)]
pub struct RunReport {
    /// Listing cards found on the page, malformed ones included
    pub candidates: usize,
    pub malformed: usize,
    pub already_known: usize,
    pub failed_inserts: usize,
    /// Records written during this run, in page order
    pub new_listings: Vec<ListingRecord>,
    pub dispatch: DispatchSummary,
}

/// Single pass: snapshot seen ids, fetch, extract, persist the unseen, notify.
pub struct IngestionPipeline<'a> {
    source: &'a dyn ListingSource,
    store: &'a dyn SeenStore,
    notifier: &'a Notifier,
    extractor: ListingExtractor,
}

impl<'a> IngestionPipeline<'a> {
    pub fn new(
        source: &'a dyn ListingSource,
        store: &'a dyn SeenStore,
        notifier: &'a Notifier,
    ) -> Result<Self> {
        Ok(Self {
            source,
            store,
            notifier,
            extractor: ListingExtractor::new()?,
        })
    }

    /// Fails only if the seen-id snapshot or the page fetch fails. Malformed
    /// cards, failed inserts and failed notification chunks are logged and counted.
    #[instrument(name = "ingest_run", skip_all, fields(source = self.source.source_name()))]
    pub async fn run(&self) -> Result<RunReport> {
        let seen = self.store.existing_ids().await?;
        let html = self.source.fetch_page().await?;

        let candidates = extract_page(&self.extractor, &html);
        let mut report = RunReport {
            candidates: candidates.len(),
            ..Default::default()
        };

        for candidate in candidates {
            let mut record = match candidate {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping listing: {}", e);
                    report.malformed += 1;
                    continue;
                }
            };

            if seen.contains(&record.id) {
                debug!("Already known: {}", record.id);
                report.already_known += 1;
                continue;
            }

            match self.store.insert_if_absent(&record).await {
                Ok(InsertOutcome::Inserted(added_at)) => {
                    record.added_at = Some(added_at);
                    if !record.has_price() {
                        debug!("No price on listing {}", record.id);
                    }
                    info!("New listing found: {}", record.title);
                    report.new_listings.push(record);
                }
                // Same id listed twice on one page
                Ok(InsertOutcome::AlreadyPresent) => {
                    report.already_known += 1;
                }
                Err(e) => {
                    warn!("Error saving listing {}: {}", record.id, e);
                    report.failed_inserts += 1;
                }
            }
        }

        info!(
            "Processed {} cards: {} new, {} known, {} malformed, {} failed to save",
            report.candidates,
            report.new_listings.len(),
            report.already_known,
            report.malformed,
            report.failed_inserts
        );

        report.dispatch = self.notifier.notify(&report.new_listings).await;

        Ok(report)
    }
}
