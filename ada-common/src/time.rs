//! Timestamp utilities

use chrono::{DateTime, Local, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Wall-clock time of day as `HH:MM:SS` in the local timezone
///
/// Used for the `timestamp` field of real-time chunk results.
pub fn clock_time() -> String {
    format_clock_time(&Local::now())
}

/// Format any timestamp as `HH:MM:SS`
pub fn format_clock_time<Tz: chrono::TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M:%S").to_string()
}

/// Convert fractional seconds to duration, clamping negatives and NaN to zero
pub fn secs_f64_to_duration(secs: f64) -> std::time::Duration {
    if secs.is_finite() && secs > 0.0 {
        std::time::Duration::try_from_secs_f64(secs).unwrap_or(std::time::Duration::MAX)
    } else {
        std::time::Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    #[test]
    fn test_now_returns_recent_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
        assert!(timestamp.timestamp() < 4_102_444_800); // 2100-01-01 00:00:00 UTC
    }

    #[test]
    fn test_format_clock_time_zero_padded() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap();
        assert_eq!(format_clock_time(&at), "07:05:03");
    }

    #[test]
    fn test_clock_time_shape() {
        let s = clock_time();
        assert_eq!(s.len(), 8);
        let parts: Vec<&str> = s.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() == 2 && p.parse::<u32>().is_ok()));
    }

    #[test]
    fn test_secs_f64_to_duration() {
        assert_eq!(secs_f64_to_duration(1.5), Duration::from_millis(1500));
        assert_eq!(secs_f64_to_duration(0.0), Duration::ZERO);
        assert_eq!(secs_f64_to_duration(-3.0), Duration::ZERO);
        assert_eq!(secs_f64_to_duration(f64::NAN), Duration::ZERO);
    }
}
