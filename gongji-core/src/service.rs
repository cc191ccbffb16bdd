//! High-level service facade combining both notice sources.

use std::sync::Arc;

use crate::model::Notice;
use crate::ports::{NoticePort, SourceError};
use crate::window::{Clock, TimeWindow};

/// Public entry point for one notice-checking run.
///
/// The primary source is authoritative: its failures abort the run. The
/// secondary port absorbs its own failures and always yields a result, so
/// this service never fails on its behalf.
pub struct NoticeService {
    clock: Arc<dyn Clock>,
    primary: Arc<dyn NoticePort>,
    secondary: Arc<dyn NoticePort>,
}

impl NoticeService {
    /// Create a new service bound to the given clock and source ports.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        primary: Arc<dyn NoticePort>,
        secondary: Arc<dyn NoticePort>,
    ) -> Self {
        Self {
            clock,
            primary,
            secondary,
        }
    }

    /// Fetch fresh notices from both sources, sequentially.
    ///
    /// `now` is captured once, so every record in the run is judged against
    /// the same window. The two sequences come back separately, each already
    /// ordered by post date; combining them is the caller's business.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the primary source request fails.
    pub async fn check_notices(&self) -> Result<(Vec<Notice>, Vec<Notice>), SourceError> {
        let window = TimeWindow::ending_at(self.clock.now());

        let primary = self.primary.fetch(&window).await?;
        let secondary = self.secondary.fetch(&window).await?;

        Ok((primary, secondary))
    }
}
