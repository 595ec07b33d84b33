use sysmon::ui::{format_bytes, format_signed_bytes};

#[test]
fn test_documented_values() {
    assert_eq!(format_bytes(0), "0.00B");
    assert_eq!(format_bytes(1024), "1.00KB");
    assert_eq!(format_bytes(1536), "1.50KB");
    assert_eq!(format_bytes(1024u64.pow(4)), "1.00TB");
}

#[test]
fn test_largest_unit_below_1024() {
    assert_eq!(format_bytes(1024 * 1024 - 1), "1024.00KB");
    assert_eq!(format_bytes(5 * 1024 * 1024 * 1024 + 512 * 1024 * 1024), "5.50GB");
    assert_eq!(format_bytes(u64::MAX), "16384.00PB");
}

#[test]
fn test_signed_input_clamped() {
    assert_eq!(format_signed_bytes(i64::MIN), "0.00B");
}
