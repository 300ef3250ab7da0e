//! Calendar-day clock with a fixed UTC offset.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Supplies "today" for batch stamping, narrative dates, and file names.
///
/// The deployment publishes on a fixed local calendar (the original site runs
/// on US Eastern), so the offset is configuration, not the host timezone.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    offset: FixedOffset,
}

impl Clock {
    /// Create a clock from a whole-hour UTC offset.
    ///
    /// Offsets outside +/-23 hours fall back to UTC.
    pub fn from_offset_hours(hours: i32) -> Self {
        let offset = FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    /// Current instant in the configured offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Today as `YYYY-MM-DD`.
    pub fn today(&self) -> String {
        self.now().format("%Y-%m-%d").to_string()
    }

    /// Today as `YYYYMMDD`, for directory names and commit messages.
    pub fn today_compact(&self) -> String {
        self.now().format("%Y%m%d").to_string()
    }

    /// Current instant as `YYYYMMDD_HHMMSS`, for file-name suffixes.
    pub fn timestamp_compact(&self) -> String {
        self.now().format("%Y%m%d_%H%M%S").to_string()
    }
}
