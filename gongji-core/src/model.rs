//! Domain data structures for notice sources and normalized notices.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display/sort format for [`Notice::post_date`]. Zero-padded so that
/// lexicographic order equals chronological order.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a notice source known to gongji.
pub struct SourceId(pub String);

impl fmt::Display for SourceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a source and the category label attached to its notices.
pub struct SourceMeta {
    /// Unique identifier.
    pub id: SourceId,
    /// Fixed category label shown to readers, e.g. "CAU 공지".
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One bulletin posting, normalized across all sources.
pub struct Notice {
    /// Upstream-provided display title; may be empty.
    pub title: String,
    /// Category label of the source that produced this notice.
    pub category: String,
    /// Posting time formatted with [`DISPLAY_DATE_FORMAT`]; doubles as the sort key.
    pub post_date: String,
    /// Absolute link to the full posting, when the source provides one.
    pub url: Option<String>,
}
