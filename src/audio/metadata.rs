use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Stdio};

use lofty::AudioFile;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Properties of the selected source file, shown before compressing
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    /// File size in bytes
    pub size: u64,
    /// Duration in seconds (0.0 if unknown)
    pub duration: f64,
    /// Source audio bitrate in kbps, if the container reports one
    pub bitrate: Option<u32>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
}

/// Read size and audio properties of a file using lofty
pub fn read_source_info(path: &Path) -> Result<SourceInfo, String> {
    let size = fs::metadata(path)
        .map_err(|e| format!("Failed to get file metadata: {}", e))?
        .len();

    let tagged = lofty::read_from_path(path)
        .map_err(|e| format!("Failed to read audio properties: {}", e))?;
    let properties = tagged.properties();

    Ok(SourceInfo {
        size,
        duration: properties.duration().as_secs_f64(),
        bitrate: properties.audio_bitrate(),
        sample_rate: properties.sample_rate(),
        channels: properties.channels(),
    })
}

/// Get the duration of the first audio stream in seconds
///
/// Asks ffprobe first. If ffprobe is unavailable or cannot report a duration,
/// falls back to decoding the container headers in-process with Symphonia.
pub fn probe_duration(ffprobe_path: Option<&Path>, path: &Path) -> Result<f64, String> {
    let ffprobe_error = match ffprobe_path {
        Some(ffprobe) => match ffprobe_duration(ffprobe, path) {
            Ok(duration) => return Ok(duration),
            Err(e) => {
                log::warn!("ffprobe could not read duration of {}: {}", path.display(), e);
                e
            }
        },
        None => "ffprobe not found".to_string(),
    };

    symphonia_duration(path).map_err(|e| format!("{}; {}", ffprobe_error, e))
}

/// Run ffprobe and read `stream=duration` of the first audio stream
pub fn ffprobe_duration(ffprobe_path: &Path, path: &Path) -> Result<f64, String> {
    let output = Command::new(ffprobe_path)
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("a:0")
        .arg("-show_entries")
        .arg("stream=duration")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format!("Failed to spawn ffprobe: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "ffprobe exited with status {}: {}",
            output.status,
            stderr.lines().last().unwrap_or("Unknown error")
        ));
    }

    parse_ffprobe_duration(&String::from_utf8_lossy(&output.stdout))
}

/// Parse ffprobe's plain-value output (first non-empty line, seconds)
pub fn parse_ffprobe_duration(stdout: &str) -> Result<f64, String> {
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| "No audio stream found".to_string())?;

    let duration: f64 = line
        .parse()
        .map_err(|_| format!("Unexpected duration value: {}", line))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(format!("Invalid duration: {}", line));
    }

    Ok(duration)
}

/// Compute the duration from the default track's frame count and sample rate
pub fn symphonia_duration(path: &Path) -> Result<f64, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(&ext.to_string_lossy());
    }

    let format_opts = FormatOptions::default();
    let metadata_opts = MetadataOptions::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &metadata_opts)
        .map_err(|e| format!("Failed to probe audio format: {}", e))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| "No default track found".to_string())?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| "Unknown sample rate".to_string())? as f64;
    let n_frames = track
        .codec_params
        .n_frames
        .ok_or_else(|| "Unknown frame count".to_string())?;

    let duration = n_frames as f64 / sample_rate;
    if duration <= 0.0 {
        return Err("Audio stream is empty".to_string());
    }

    Ok(duration)
}
