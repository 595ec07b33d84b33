use chrono::{DateTime, Local};

const UNITS: [&str; 6] = ["", "K", "M", "G", "T", "P"];
const FACTOR: f64 = 1024.0;

/// Format a byte count with the largest binary unit that keeps the value
/// below 1024, two decimals and a `B` suffix (`1536` -> `"1.50KB"`).
///
/// Values past the petabyte range stay in `PB`.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= FACTOR && unit < UNITS.len() - 1 {
        value /= FACTOR;
        unit += 1;
    }
    format!("{:.2}{}B", value, UNITS[unit])
}

/// Same as [`format_bytes`] for signed inputs; negatives clamp to zero.
pub fn format_signed_bytes(bytes: i64) -> String {
    format_bytes(bytes.max(0) as u64)
}

/// ctime-style timestamp, e.g. `Wed Oct 14 09:05:03 2026`.
pub fn format_ctime(time: &DateTime<Local>) -> String {
    time.format("%a %b %e %H:%M:%S %Y").to_string()
}

/// Short timestamp for headers (YYYY-MM-DD HH:MM:SS)
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_bytes_units() {
        assert_eq!(format_bytes(0), "0.00B");
        assert_eq!(format_bytes(1023), "1023.00B");
        assert_eq!(format_bytes(1024), "1.00KB");
        assert_eq!(format_bytes(1536), "1.50KB");
        assert_eq!(format_bytes(1024 * 1024 * 3 / 2), "1.50MB");
        assert_eq!(format_bytes(1024u64.pow(3)), "1.00GB");
        assert_eq!(format_bytes(1024u64.pow(4)), "1.00TB");
        assert_eq!(format_bytes(1024u64.pow(5)), "1.00PB");
    }

    #[test]
    fn test_format_bytes_beyond_petabytes() {
        assert_eq!(format_bytes(1024u64.pow(5) * 2048), "2048.00PB");
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(format_signed_bytes(-42), "0.00B");
        assert_eq!(format_signed_bytes(2048), "2.00KB");
    }

    #[test]
    fn test_ctime_format() {
        let time = Local.with_ymd_and_hms(2026, 10, 4, 9, 5, 3).unwrap();
        assert_eq!(format_ctime(&time), "Sun Oct  4 09:05:03 2026");
        assert_eq!(format_time(&time), "2026-10-04 09:05:03");
    }
}
