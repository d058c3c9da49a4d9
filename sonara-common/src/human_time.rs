//! Transport clock formatting
//!
//! Positions and durations on the playback controls are rendered as `M:SS`:
//! whole minutes without a leading zero, then whole seconds padded to two
//! digits. Minutes never roll over into hours, so an hour-long track reads
//! `60:00`.

/// Format a position or duration in seconds as `M:SS`.
///
/// Fractional seconds are truncated, not rounded. Negative and non-finite
/// values (a media element reports `NaN` before metadata arrives and
/// `Infinity` for live streams) render as `0:00`.
///
/// # Examples
///
/// ```
/// use sonara_common::human_time::format_clock;
///
/// assert_eq!(format_clock(0.0), "0:00");
/// assert_eq!(format_clock(125.0), "2:05");
/// assert_eq!(format_clock(42.3), "0:42");
/// assert_eq!(format_clock(3600.0), "60:00");
/// ```
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let whole = seconds.floor() as u64;
    let minutes = whole / 60;
    let secs = whole % 60;
    format!("{}:{:02}", minutes, secs)
}
