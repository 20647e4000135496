//! FFmpeg subprocess handling for size-targeted re-encoding

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::core::{bitrate_arg, CompressionOutcome, CompressionState};

/// Build the ffmpeg arguments for one compression
///
/// -y                    : Overwrite output file without asking
/// -i <input>            : Input file
/// -vn                   : Drop embedded cover art (unless keeping it)
/// -codec:a libmp3lame   : LAME MP3 encoder
/// -b:a <bitrate>k       : Constant target bitrate
/// -map_metadata 0       : Carry over ID3 tags
/// -id3v2_version 3      : Widest player compatibility
pub fn build_args(
    input_path: &Path,
    output_path: &Path,
    bitrate: u32,
    keep_album_art: bool,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input_path.into()];

    if keep_album_art {
        args.extend(["-c:v".into(), "copy".into()]);
    } else {
        args.push("-vn".into());
    }

    args.extend([
        "-codec:a".into(),
        "libmp3lame".into(),
        "-b:a".into(),
        bitrate_arg(bitrate).into(),
        "-map_metadata".into(),
        "0".into(),
        "-id3v2_version".into(),
        "3".into(),
        output_path.into(),
    ]);

    args
}

/// Re-encode `input_path` into `output_path` at `bitrate` kbps
///
/// The ffmpeg PID is registered with `state` so the UI can kill it.
/// Partial output is removed on failure or cancellation.
pub fn compress_file(
    ffmpeg_path: &Path,
    input_path: &Path,
    output_path: &Path,
    bitrate: u32,
    keep_album_art: bool,
    state: &CompressionState,
) -> Result<CompressionOutcome, String> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create output directory: {}", e))?;
        }
    }

    let original_size = std::fs::metadata(input_path)
        .map_err(|e| format!("Failed to read source file: {}", e))?
        .len();

    log::info!(
        "Compressing: {} -> {} at {}kbps",
        input_path.display(),
        output_path.display(),
        bitrate
    );

    let mut cmd = Command::new(ffmpeg_path);
    cmd.args(build_args(input_path, output_path, bitrate, keep_album_art));
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::piped());

    let child = cmd.spawn().map_err(|e| format!("Failed to spawn ffmpeg: {}", e))?;
    state.register_pid(child.id());

    // Cancel may have landed between spawn and register
    if state.is_cancelled() {
        state.cancel();
    }

    let output = child.wait_with_output();
    state.unregister_pid();
    let output = output.map_err(|e| format!("Failed to wait for ffmpeg: {}", e))?;

    if state.is_cancelled() {
        let _ = std::fs::remove_file(output_path);
        return Err("Compression cancelled".to_string());
    }

    if !output.status.success() {
        let _ = std::fs::remove_file(output_path);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.lines().last().unwrap_or("Unknown error")
        ));
    }

    let compressed_size = std::fs::metadata(output_path)
        .map_err(|e| format!("Compressed file is missing: {}", e))?
        .len();

    Ok(CompressionOutcome {
        input_path: input_path.to_path_buf(),
        output_path: output_path.to_path_buf(),
        bitrate_kbps: bitrate,
        original_size,
        compressed_size,
    })
}
