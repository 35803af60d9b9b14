use chrono::{DateTime, TimeZone};
use html_escape::encode_text;

use crate::models::ListingRecord;

const SEPARATOR_WIDTH: usize = 30;

/// Render the full notification text for a batch of new listings.
///
/// Record fields are HTML-escaped since the message is sent in HTML parse mode.
pub fn render_message<Tz>(label: &str, records: &[ListingRecord], at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut message = format!(
        "🚗 New {} Listings Found - {}\n\n",
        encode_text(label),
        at.format("%Y-%m-%d %H:%M")
    );

    for record in records {
        message.push_str(&format!("📌 {}\n", encode_text(&record.title)));
        message.push_str(&format!("💰 Price: {}\n", encode_text(&record.price)));
        message.push_str(&format!("🔗 {}\n", encode_text(&record.url)));
        message.push_str(&"-".repeat(SEPARATOR_WIDTH));
        message.push('\n');
    }

    message
}

/// Split `text` into consecutive pieces of at most `max_chars` characters.
///
/// Splits fall on raw character offsets, so a piece may end mid-line.
/// Concatenating the pieces gives back `text`.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut taken = 0;

    for (idx, _) in text.char_indices() {
        if taken == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            taken = 0;
        }
        taken += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
