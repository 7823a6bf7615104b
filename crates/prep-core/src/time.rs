//! Time-of-day formatting helpers.
//!
//! Plan times are seconds since midnight stored as `f64` (the conventional
//! representation in transport demand data; fractional seconds survive
//! averaging).  `write_time` renders durations and times of day as
//! `hh:mm:ss`, the format used by the batch monitor's ETA display and by
//! plan CSV output.  Hours are not wrapped at 24 — a plan that ends at
//! 26:30:00 (02:30 the next day) prints exactly that, matching the input
//! convention.

/// Render seconds as `hh:mm:ss`.
///
/// Negative or non-finite inputs render as `"undefined"` — they occur only
/// for unset plan times and must never panic.
pub fn write_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "undefined".to_string();
    }
    let total = seconds.round() as u64;
    let h = total / 3_600;
    let m = (total % 3_600) / 60;
    let s = total % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Parse `hh:mm:ss` (or `hh:mm`) back into seconds since midnight.
///
/// Returns `None` for anything else, including the `"undefined"` sentinel.
pub fn parse_time(s: &str) -> Option<f64> {
    let mut parts = s.trim().split(':');
    let h: u64 = parts.next()?.parse().ok()?;
    let m: u64 = parts.next()?.parse().ok()?;
    let sec: u64 = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() || m >= 60 || sec >= 60 {
        return None;
    }
    Some((h * 3_600 + m * 60 + sec) as f64)
}
