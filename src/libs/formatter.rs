//! Text formatting for the badge and for console tables.

use crate::libs::config::ONE_MINUTE_MS;

/// Badge text for a remaining time, `MM:SS`.
///
/// Only minutes within the hour are shown, so 75 minutes read `15:00`. This
/// is what fits on the badge; durations longer than an hour are rare.
pub fn format_badge(millis: u64) -> String {
    let total_seconds = millis / 1000;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Remaining time including hours, `H:MM:SS` or `MM:SS`.
pub fn format_remaining(millis: u64) -> String {
    let total_seconds = millis / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Minutes as `1h 05m`, `25m` or `12.5m`.
pub fn format_minutes(minutes: f64) -> String {
    let minutes = minutes.max(0.0);
    if minutes >= 60.0 {
        let whole = minutes.round() as u64;
        format!("{}h {:02}m", whole / 60, whole % 60)
    } else if minutes.fract() == 0.0 {
        format!("{}m", minutes as u64)
    } else {
        format!("{minutes:.1}m")
    }
}

/// A duration setting in whole minutes, as entered on the command line.
pub fn format_duration_setting(millis: u64) -> String {
    format_minutes(millis as f64 / ONE_MINUTE_MS as f64)
}
