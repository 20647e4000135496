//! Audio conversion module
//!
//! Locates the ffmpeg tools and re-encodes MP3s at a size-targeted bitrate.

mod ffmpeg;
mod worker;

pub use worker::{start_compression, CompressionJob};

use std::path::{Path, PathBuf};

/// Find a bundled or installed tool (e.g. "ffmpeg", "ffprobe")
///
/// Search order:
/// 1. CARGO_MANIFEST_DIR/resources/bin (development)
/// 2. The app bundle's Contents/Resources/bin (release on macOS)
/// 3. resources/bin next to the executable
/// 4. Every directory on PATH
pub fn find_tool(name: &str) -> Result<PathBuf, String> {
    let file_name = executable_name(name);

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let dev_path = PathBuf::from(manifest_dir)
            .join("resources")
            .join("bin")
            .join(&file_name);

        if dev_path.exists() {
            log::debug!("Found {} at development path: {:?}", name, dev_path);
            return Ok(dev_path);
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            // macOS app bundle: Contents/MacOS/../Resources/bin/<tool>
            let bundle_path = exe_dir
                .join("..")
                .join("Resources")
                .join("bin")
                .join(&file_name);

            if bundle_path.exists() {
                log::debug!("Found {} at bundle path: {:?}", name, bundle_path);
                return Ok(bundle_path);
            }

            let local_path = exe_dir.join("resources").join("bin").join(&file_name);
            if local_path.exists() {
                log::debug!("Found {} at local path: {:?}", name, local_path);
                return Ok(local_path);
            }
        }
    }

    if let Some(path_var) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&path_var) {
            let candidate = dir.join(&file_name);
            if candidate.is_file() {
                log::debug!("Found {} on PATH: {:?}", name, candidate);
                return Ok(candidate);
            }
        }
    }

    Err(format!(
        "{} binary not found. Install ffmpeg or place it at resources/bin/{}",
        name, file_name
    ))
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

/// Get the path to the ffmpeg binary
pub fn get_ffmpeg_path() -> Result<PathBuf, String> {
    find_tool("ffmpeg")
}

/// Get the path to the ffprobe binary
pub fn get_ffprobe_path() -> Result<PathBuf, String> {
    find_tool("ffprobe")
}

/// Verify that a tool exists and is executable
pub fn verify_tool(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Tool not found at {:?}", path));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = std::fs::metadata(path)
            .map_err(|e| format!("Failed to get metadata for {:?}: {}", path, e))?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(format!("{:?} is not executable", path));
        }
    }

    Ok(())
}

/// Locate and verify ffmpeg
pub fn verify_ffmpeg() -> Result<PathBuf, String> {
    let path = get_ffmpeg_path()?;
    verify_tool(&path)?;
    log::info!("ffmpeg verified at: {:?}", path);
    Ok(path)
}
