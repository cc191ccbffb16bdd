//! Traits describing notice sources and the shared normalization pipeline.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, ParseError as ChronoParseError};
use reqwest::Error as ReqwestError;

use crate::model::{DISPLAY_DATE_FORMAT, Notice, SourceMeta};
use crate::window::TimeWindow;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to upstream bulletin APIs.
pub enum SourceError {
    /// Network layer failed or the upstream returned an error status.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Failed to parse a timestamp from an upstream item.
    #[error("Timestamp parse error: {0}")]
    Parse(#[from] ChronoParseError),
    /// An upstream item lacked a field the source requires.
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    /// Internal source error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// One upstream item after source-specific decoding, before window filtering.
#[derive(Debug, Clone)]
pub struct Posting {
    /// When the item was posted, in the upstream's zone.
    pub posted_at: DateTime<FixedOffset>,
    /// Display title; may be empty.
    pub title: String,
    /// Absolute link to the posting, when one can be built.
    pub url: Option<String>,
}

#[async_trait]
/// Trait for source-specific notice backends.
pub trait NoticePort: Send + Sync {
    /// Metadata describing the source handled by this port.
    fn source(&self) -> &SourceMeta;

    /// Fetch, filter, and normalize the notices visible inside `window`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the upstream request fails, unless the
    /// source's policy is to absorb its own failures.
    async fn fetch(&self, window: &TimeWindow) -> Result<Vec<Notice>, SourceError>;
}

/// Shared tail of every source pipeline: decode each raw item, drop the ones
/// that fail (logged, never fatal to the batch), keep the ones inside the
/// window, and normalize into [`Notice`] records ordered by post date.
///
/// The sort is stable, so items with equal timestamps keep their upstream
/// relative order.
pub fn collect_in_window<R, F>(
    items: Vec<R>,
    source: &SourceMeta,
    window: &TimeWindow,
    decode: F,
) -> Vec<Notice>
where
    F: Fn(R) -> Result<Posting, SourceError>,
{
    let mut notices: Vec<Notice> = items
        .into_iter()
        .filter_map(|item| match decode(item) {
            Ok(posting) => Some(posting),
            Err(error) => {
                tracing::warn!(source = %source.id, %error, "skipping malformed notice item");
                None
            }
        })
        .filter(|posting| window.contains(posting.posted_at))
        .map(|posting| Notice {
            title: posting.title,
            category: source.label.clone(),
            post_date: posting.posted_at.format(DISPLAY_DATE_FORMAT).to_string(),
            url: posting.url,
        })
        .collect();

    notices.sort_by(|left, right| left.post_date.cmp(&right.post_date));
    notices
}
