//! Reference clock and the daily notice acceptance window.

use chrono::{DateTime, Duration, FixedOffset, Utc};

/// Korea Standard Time, the zone every upstream timestamp is interpreted in.
#[must_use]
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("KST is a valid offset")
}

/// Supplies the reference instant a run is judged against.
///
/// The service captures `now` exactly once per run so that every record in
/// that run is filtered against the same window. Tests substitute a fixed
/// clock.
pub trait Clock: Send + Sync {
    /// Current zoned instant.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Production clock: system time converted to KST.
#[derive(Debug, Clone, Copy, Default)]
pub struct KstClock;

impl Clock for KstClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&kst())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Inclusive acceptance interval for notice timestamps.
///
/// Spans from yesterday 08:00:00 to today 08:00:00 relative to the reference
/// instant, matching the daily batch-notification cadence.
pub struct TimeWindow {
    /// Start of the interval (inclusive).
    pub start: DateTime<FixedOffset>,
    /// End of the interval (inclusive).
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// Build the window ending at 08:00 of `now`'s calendar date, in `now`'s zone.
    #[must_use]
    pub fn ending_at(now: DateTime<FixedOffset>) -> Self {
        let end = now
            .date_naive()
            .and_hms_opt(8, 0, 0)
            .expect("08:00:00 is a valid time of day")
            .and_local_timezone(*now.offset())
            .single()
            .expect("fixed offsets have no gaps or folds");

        Self {
            start: end - Duration::days(1),
            end,
        }
    }

    /// Whether `instant` falls inside the window. Both boundaries count.
    #[must_use]
    pub fn contains(&self, instant: DateTime<FixedOffset>) -> bool {
        self.start <= instant && instant <= self.end
    }
}
