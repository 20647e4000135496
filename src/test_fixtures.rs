//! Test fixtures for compression tests
//!
//! Generates small MP3 files with ffmpeg. When ffmpeg is not installed the
//! generators return `None` and tests that need real audio skip themselves.

#![cfg(test)]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

static FIXTURES_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the fixtures directory, creating it if necessary
pub fn fixtures_dir() -> &'static Path {
    FIXTURES_DIR.get_or_init(|| {
        let dir = std::env::temp_dir().join("mp3_compressor_test_fixtures");
        std::fs::create_dir_all(&dir).expect("Failed to create fixtures directory");
        dir
    })
}

/// Generate a sine-wave MP3 of the given duration and bitrate
///
/// Returns `None` if ffmpeg is unavailable or fails.
pub fn generate_mp3(name: &str, duration_secs: u32, bitrate: u32) -> Option<PathBuf> {
    let output_path =
        fixtures_dir().join(format!("{}_{}s_{}k.mp3", name, duration_secs, bitrate));

    // Return cached file if it exists
    if output_path.exists() {
        return Some(output_path);
    }

    let Ok(ffmpeg) = crate::conversion::get_ffmpeg_path() else {
        eprintln!("ffmpeg not available, skipping fixture {}", name);
        return None;
    };

    let status = Command::new(&ffmpeg)
        .arg("-f")
        .arg("lavfi")
        .arg("-i")
        .arg(format!("sine=frequency=440:duration={}", duration_secs))
        .arg("-codec:a")
        .arg("libmp3lame")
        .arg("-b:a")
        .arg(format!("{}k", bitrate))
        .arg("-y")
        .arg(&output_path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .ok()?;

    if status.success() && output_path.exists() {
        Some(output_path)
    } else {
        eprintln!("ffmpeg failed to generate fixture {}", name);
        None
    }
}

/// Write an executable shell script named `name` into `dir`
///
/// `body` runs under `/bin/sh` with the tool's arguments. `$out` holds the
/// last argument (ffmpeg's output path).
#[cfg(unix)]
pub fn write_fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let script = format!("#!/bin/sh\nfor out; do :; done\n{}\n", body);
    std::fs::write(&path, script).expect("Failed to write fake tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake tool executable");
    path
}
