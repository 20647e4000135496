//! Logging configuration for MP3 Compressor
//!
//! Logs are written to both the terminal and a file at:
//! `~/Library/Logs/MP3-Compressor/mp3-compressor.log`
//!
//! Every compression (success or failure) is recorded there.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    ThreadLogMode, WriteLogger,
};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const APP_LOG_DIR: &str = "MP3-Compressor";
const LOG_FILE_NAME: &str = "mp3-compressor.log";

/// Rotate the log once it grows past this size
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Get the log directory path
/// On macOS: ~/Library/Logs/MP3-Compressor/
pub fn get_log_directory() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Logs").join(APP_LOG_DIR))
    } else {
        dirs::data_local_dir().map(|d| d.join(APP_LOG_DIR).join("logs"))
    }
}

/// Get the current log file path
pub fn get_log_file_path() -> Option<PathBuf> {
    get_log_directory().map(|d| d.join(LOG_FILE_NAME))
}

/// Move an oversized log aside to `<name>.old`
fn rotate_if_needed(log_path: &Path) {
    if let Ok(metadata) = fs::metadata(log_path) {
        if metadata.len() > MAX_LOG_SIZE {
            let backup_path = log_path.with_extension("log.old");
            let _ = fs::rename(log_path, &backup_path);
        }
    }
}

/// Shared format: RFC 3339 timestamps, no module targets
///
/// Thread names are shown for errors so worker failures are easy to spot.
fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Error)
        .set_thread_mode(ThreadLogMode::Names)
        .set_target_level(LevelFilter::Off)
        .build()
}

fn terminal_logger() -> Box<TermLogger> {
    TermLogger::new(LevelFilter::Info, log_config(), TerminalMode::Mixed, ColorChoice::Auto)
}

/// Create the log directory, rotate and open the log for appending
fn open_log_file() -> Result<(PathBuf, File), String> {
    let log_path = get_log_file_path().ok_or("Could not determine log directory")?;
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir).map_err(|e| format!("Could not create log directory: {}", e))?;
    }

    rotate_if_needed(&log_path);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| format!("Could not open log file: {}", e))?;
    Ok((log_path, file))
}

/// Initialize the logging system
///
/// Info and above go to the terminal, debug and above to the log file.
/// Falls back to terminal-only logging if the file can't be opened.
///
/// Returns the path to the log file on success
pub fn init_logging() -> Option<PathBuf> {
    let (log_path, log_file) = match open_log_file() {
        Ok(opened) => opened,
        Err(e) => {
            eprintln!("Warning: {}", e);
            let _ = CombinedLogger::init(vec![terminal_logger() as Box<dyn SharedLogger>]);
            return None;
        }
    };

    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        terminal_logger(),
        WriteLogger::new(LevelFilter::Debug, log_config(), log_file),
    ];
    if CombinedLogger::init(loggers).is_err() {
        eprintln!("Warning: Logger already initialized");
    }

    log::info!("=== MP3 Compressor session started ===");
    log::info!("Log file: {}", log_path.display());

    Some(log_path)
}

/// Command used to reveal a folder in the platform file manager
fn file_manager_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Open the log directory in the file manager (for users to access logs)
pub fn open_log_directory() -> Result<(), String> {
    let log_dir = get_log_directory().ok_or("Could not determine log directory")?;
    if !log_dir.exists() {
        return Err("Log directory does not exist".to_string());
    }

    std::process::Command::new(file_manager_command())
        .arg(&log_dir)
        .spawn()
        .map_err(|e| format!("Failed to open log directory: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_log_directory_returns_path() {
        let dir = get_log_directory();
        assert!(dir.is_some(), "Should return a log directory path");

        let path = dir.unwrap();
        assert!(
            path.to_string_lossy().contains("MP3-Compressor"),
            "Path should contain app name"
        );
    }

    #[test]
    fn test_get_log_file_path_returns_path() {
        let path = get_log_file_path();
        assert!(path.is_some(), "Should return a log file path");

        let file_path = path.unwrap();
        assert!(
            file_path.to_string_lossy().ends_with("mp3-compressor.log"),
            "Path should end with log filename"
        );
    }

    #[test]
    fn test_log_file_path_is_inside_log_directory() {
        let dir = get_log_directory().unwrap();
        let file = get_log_file_path().unwrap();

        assert!(
            file.starts_with(&dir),
            "Log file should be inside log directory"
        );
    }

    #[test]
    fn test_rotate_moves_large_log() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_path = dir.path().join(LOG_FILE_NAME);
        let file = fs::File::create(&log_path).unwrap();
        file.set_len(MAX_LOG_SIZE + 1).unwrap();

        rotate_if_needed(&log_path);

        assert!(!log_path.exists());
        assert!(dir.path().join("mp3-compressor.log.old").exists());
    }

    #[test]
    fn test_rotate_keeps_small_log() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_path = dir.path().join(LOG_FILE_NAME);
        fs::write(&log_path, "session\n").unwrap();

        rotate_if_needed(&log_path);

        assert!(log_path.exists());
    }
}
