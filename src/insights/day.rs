//! Calendar-day truncation policies
//!
//! Two policies are in use and are named separately on purpose:
//!
//! - [`utc_date`]: the UTC date of an instant. Used for calendar buckets and
//!   balanced-day grouping.
//! - [`LocalDay`]: the date in a fixed local offset. Used for streak
//!   detection, where the user's own midnight decides what "the next day" is.
//!
//! `LocalDay` with a zero offset agrees with `utc_date`.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// UTC calendar date of an instant
pub fn utc_date(ts: &DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Calendar date in a fixed UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDay {
    offset: FixedOffset,
}

impl LocalDay {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Offset east of UTC in minutes; `None` outside ±24h
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        let seconds = minutes.checked_mul(60)?;
        FixedOffset::east_opt(seconds).map(|offset| Self { offset })
    }

    /// Date of `ts` with its time of day zeroed in this offset
    pub fn day_of(&self, ts: &DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for LocalDay {
    fn default() -> Self {
        Self::utc()
    }
}
