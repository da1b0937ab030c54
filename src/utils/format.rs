use chrono::{DateTime, Utc};
use std::time::Duration;

/// Formátuje čas pro sloupec "Last Updated"
/// Příklad: 2024-03-14T10:30:00Z -> "2024-03-14 10:30:00 UTC"
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Formátuje dobu běhu na human-readable formát
/// Příklad: 75s -> "1m 15s"
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs == 0 {
        return format!("{} ms", duration.as_millis());
    }

    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
