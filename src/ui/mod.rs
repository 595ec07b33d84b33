// UI and formatting module

pub mod formatters;
pub mod monitor_tui;
pub mod system_formatters;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_bytes, format_ctime, format_signed_bytes, format_time};
pub use system_formatters::{print_snapshot, snapshot_sections, Section};
