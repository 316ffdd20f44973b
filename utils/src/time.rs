//! Time formatting helpers.

use dvault_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// "in 5m 0s" while `target` is ahead of `now`, "passed" once reached.
pub fn format_until(target: Timestamp, now: Timestamp) -> String {
    match target.secs_until(now) {
        0 => "passed".to_string(),
        secs => format!("in {}", format_duration(secs)),
    }
}
