use std::sync::OnceLock;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// The local UTC offset, resolved once.
///
/// Resolution fails on some platforms once other threads exist, so call this
/// before the async runtime starts. Falls back to UTC.
pub fn local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

pub fn to_local_time(dt: OffsetDateTime) -> OffsetDateTime {
    dt.to_offset(local_offset())
}

/// Midnight-to-midnight span of `days` days starting at `start` in `offset`.
pub fn date_range(start: Date, days: i64, offset: UtcOffset) -> (OffsetDateTime, OffsetDateTime) {
    let from = start.midnight().assume_offset(offset);
    (from, from + Duration::days(days))
}

/// `1h 5m 3s`, `5m 3s` or `3s`. Negative durations render as zero.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.whole_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// `HH:MM` clock time in the local offset.
pub fn format_clock(dt: OffsetDateTime) -> String {
    let local = to_local_time(dt);
    format!("{:02}:{:02}", local.hour(), local.minute())
}

/// `Mon 2024-01-15`.
pub fn format_day(date: Date) -> String {
    date.format(format_description!("[weekday repr:short] [year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}
