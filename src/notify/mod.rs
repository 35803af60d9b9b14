use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::{error, info};

use crate::config::MAX_MESSAGE_CHARS;
use crate::error::Result;
use crate::models::ListingRecord;

pub mod format;
pub mod telegram;

pub use format::{chunk_text, render_message};
pub use telegram::TelegramChannel;

/// Outbound text channel. One call is one message.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Send one message; transport failures come back as `NotifyDispatch`.
    async fn send_text(&self, text: &str) -> Result<()>;

    fn channel_name(&self) -> &'static str;
}

/// Per-run dispatch counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub chunks: usize,
    pub sent: usize,
    pub failed: usize,
}

pub struct Notifier {
    channel: Box<dyn MessageChannel>,
    label: String,
    max_chars: usize,
}

impl Notifier {
    pub fn new(channel: Box<dyn MessageChannel>, label: impl Into<String>) -> Self {
        Self {
            channel,
            label: label.into(),
            max_chars: MAX_MESSAGE_CHARS,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Announce `batch` through the channel, stamped with the local time.
    pub async fn notify(&self, batch: &[ListingRecord]) -> DispatchSummary {
        self.notify_at(batch, &Local::now()).await
    }

    /// Same as `notify` with an explicit header timestamp.
    ///
    /// Every chunk is attempted once even if an earlier one failed. An empty
    /// batch sends nothing.
    pub async fn notify_at(&self, batch: &[ListingRecord], at: &DateTime<Local>) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        if batch.is_empty() {
            return summary;
        }

        let message = render_message(&self.label, batch, at);
        let chunks = chunk_text(&message, self.max_chars);
        summary.chunks = chunks.len();

        for (idx, chunk) in chunks.iter().enumerate() {
            match self.channel.send_text(chunk).await {
                Ok(()) => {
                    summary.sent += 1;
                    info!(
                        "{} notification sent ({}/{})",
                        self.channel.channel_name(),
                        idx + 1,
                        chunks.len()
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(
                        "Failed to send {} notification ({}/{}): {}",
                        self.channel.channel_name(),
                        idx + 1,
                        chunks.len(),
                        e
                    );
                }
            }
        }

        summary
    }

    /// Send a fixed message to check that the channel credentials work.
    pub async fn send_test_message(&self) -> Result<()> {
        let text = format!("🔄 This is a test message from the {} scraper", self.label);
        self.channel.send_text(&text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    /// Records every message; fails the calls whose index is listed.
    #[derive(Clone, Default)]
    struct RecordingChannel {
        sent: Arc<Mutex<Vec<String>>>,
        fail_on: Vec<usize>,
    }

    #[async_trait]
    impl MessageChannel for RecordingChannel {
        async fn send_text(&self, text: &str) -> Result<()> {
            let mut sent = self.sent.lock().unwrap();
            let idx = sent.len();
            sent.push(text.to_string());
            if self.fail_on.contains(&idx) {
                return Err(ScoutError::NotifyDispatch(format!("chunk {idx} rejected")));
            }
            Ok(())
        }

        fn channel_name(&self) -> &'static str {
            "recording"
        }
    }

    fn batch(n: usize) -> Vec<ListingRecord> {
        (0..n)
            .map(|i| {
                ListingRecord::new(
                    i.to_string(),
                    format!("BMW 240 #{i}"),
                    "€12000",
                    format!("/obiava-{i}-bmw"),
                )
            })
            .collect()
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn empty_batch_sends_nothing() {
        let channel = RecordingChannel::default();
        let notifier = Notifier::new(Box::new(channel.clone()), "BMW 240");

        let summary = notifier.notify(&[]).await;

        assert_eq!(summary, DispatchSummary::default());
        assert!(channel.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn long_batch_is_split_into_ceil_chunks() {
        let channel = RecordingChannel::default();
        let notifier = Notifier::new(Box::new(channel.clone()), "BMW 240").with_max_chars(200);
        let records = batch(25);

        let summary = notifier.notify_at(&records, &at()).await;

        let rendered = render_message("BMW 240", &records, &at());
        let expected_chunks = rendered.chars().count().div_ceil(200);
        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), expected_chunks);
        assert_eq!(summary.chunks, expected_chunks);
        assert_eq!(summary.sent, expected_chunks);
        assert_eq!(sent.concat(), rendered);
    }

    #[tokio::test]
    async fn failed_chunk_does_not_stop_the_rest() {
        let channel = RecordingChannel {
            fail_on: vec![0],
            ..Default::default()
        };
        let notifier = Notifier::new(Box::new(channel.clone()), "BMW 240").with_max_chars(100);

        let summary = notifier.notify_at(&batch(5), &at()).await;

        assert!(summary.chunks > 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.sent, summary.chunks - 1);
        assert_eq!(channel.sent.lock().unwrap().len(), summary.chunks);
    }

    #[tokio::test]
    async fn test_message_mentions_label() {
        let channel = RecordingChannel::default();
        let notifier = Notifier::new(Box::new(channel.clone()), "BMW 240");

        notifier.send_test_message().await.unwrap();

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("BMW 240"));
    }
}
