//! Human-readable formatting for sizes, durations and bitrates

use super::bitrate::BYTES_PER_MB;

/// Format a byte count as binary megabytes with two decimals ("3.42 MB")
///
/// Uses the same megabyte the target size is entered in, so the
/// before/after sizes compare directly with what the user typed.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
}

/// Format duration as "Xm Ys"
pub fn format_duration(seconds: f64) -> String {
    let total_secs = seconds.max(0.0).round() as u64;
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{}m {}s", mins, secs)
}

/// Label for the source file size
pub fn file_size_label(bytes: Option<u64>) -> String {
    match bytes {
        Some(b) => format!("File size: {}", format_megabytes(b)),
        None => "File size: N/A".to_string(),
    }
}

/// Label for a path, or "N/A" when nothing is selected
pub fn path_label(prefix: &str, path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("{}: {}", prefix, p.display()),
        None => format!("{}: N/A", prefix),
    }
}
