//! Common utilities and helpers

pub mod logging;
pub mod path;
pub mod process;
pub mod workspace;

/// Utility functions
pub struct Utils;

impl Utils {
    /// Human-readable size in binary units, matching the MiB figures that
    /// download progress reports
    pub fn format_file_size(size: u64) -> String {
        const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
        if size < 1024 {
            return format!("{} B", size);
        }

        let mut value = size as f64 / 1024.0;
        let mut unit = UNITS[0];
        for next in &UNITS[1..] {
            if value < 1024.0 {
                break;
            }
            value /= 1024.0;
            unit = next;
        }
        format!("{:.2} {}", value, unit)
    }
}
