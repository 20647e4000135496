//! Single background worker for one compression run
//!
//! Keeps probing and encoding off the UI thread. Results are published
//! through `CompressionState`, which the view polls.

use std::path::PathBuf;
use std::thread;

use crate::audio::probe_duration;
use crate::core::{
    calculate_bitrate, is_within_encoder_range, CompressionOutcome, CompressionRequest,
    CompressionStage, CompressionState,
};

use super::ffmpeg::compress_file;

/// Everything the worker needs for one run
#[derive(Debug, Clone)]
pub struct CompressionJob {
    pub request: CompressionRequest,
    pub ffmpeg_path: PathBuf,
    /// None falls back to in-process duration probing
    pub ffprobe_path: Option<PathBuf>,
    pub keep_album_art: bool,
}

/// Start a compression on a background thread
///
/// Fails if a run is already in progress. The outcome is stored in `state`.
pub fn start_compression(
    job: CompressionJob,
    state: CompressionState,
) -> Result<thread::JoinHandle<()>, String> {
    if !state.try_begin() {
        return Err("A compression is already running".to_string());
    }

    let worker_state = state.clone();
    let spawned = thread::Builder::new()
        .name("compression-worker".to_string())
        .spawn(move || {
            let result = run_compression(&job, &worker_state);
            match &result {
                Ok(outcome) => log::info!(
                    "Compression succeeded: {} -> {}",
                    outcome.input_path.display(),
                    outcome.output_path.display()
                ),
                Err(e) => log::error!("Compression failed: {}", e),
            }
            worker_state.finish(result);
        });

    match spawned {
        Ok(handle) => Ok(handle),
        Err(e) => {
            let msg = format!("Failed to start worker thread: {}", e);
            state.finish(Err(msg.clone()));
            Err(msg)
        }
    }
}

/// Probe the duration, compute the bitrate and run the encoder
pub fn run_compression(
    job: &CompressionJob,
    state: &CompressionState,
) -> Result<CompressionOutcome, String> {
    let request = &job.request;

    state.set_stage(CompressionStage::Probing);
    let duration = probe_duration(job.ffprobe_path.as_deref(), &request.input_path)
        .map_err(|e| format!("Could not read the file duration: {}", e))?;

    let bitrate = calculate_bitrate(request.target_size_mb, duration)?;
    state.set_bitrate(bitrate);
    log::info!(
        "Target {:.2} MB over {:.2}s -> {} kbps",
        request.target_size_mb,
        duration,
        bitrate
    );
    if !is_within_encoder_range(bitrate) {
        log::warn!("Bitrate {} kbps is outside the LAME range; ffmpeg will clamp it", bitrate);
    }

    if state.is_cancelled() {
        return Err("Compression cancelled".to_string());
    }

    state.set_stage(CompressionStage::Encoding);
    compress_file(
        &job.ffmpeg_path,
        &request.input_path,
        &request.output_path,
        bitrate,
        job.keep_album_art,
        state,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;

    fn job_for(input: PathBuf, output: PathBuf, target_size_mb: f64) -> CompressionJob {
        CompressionJob {
            request: CompressionRequest {
                input_path: input,
                output_path: output,
                target_size_mb,
            },
            ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg"),
            ffprobe_path: None,
            keep_album_art: false,
        }
    }

    #[test]
    fn test_unreadable_input_reports_duration_error() {
        let state = CompressionState::new();
        let job = job_for(
            PathBuf::from("/nonexistent/in.mp3"),
            PathBuf::from("/nonexistent/out.mp3"),
            2.0,
        );

        let handle = start_compression(job, state.clone()).unwrap();
        handle.join().unwrap();

        assert!(!state.is_running());
        assert_eq!(state.get_stage(), CompressionStage::Failed);
        let err = state.take_outcome().unwrap().unwrap_err();
        assert!(err.starts_with("Could not read the file duration"), "{}", err);
    }

    #[test]
    fn test_second_start_is_rejected() {
        let state = CompressionState::new();
        assert!(state.try_begin());

        let job = job_for(PathBuf::from("/a.mp3"), PathBuf::from("/b.mp3"), 1.0);
        assert!(start_compression(job, state.clone()).is_err());
        assert!(state.is_running(), "The first run is untouched");
    }

    #[test]
    fn test_end_to_end_hits_target_size() {
        let Some(input) = test_fixtures::generate_mp3("worker", 30, 320) else {
            return;
        };
        let Ok(ffmpeg) = crate::conversion::get_ffmpeg_path() else {
            return;
        };
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("out.mp3");

        let mut job = job_for(input, output.clone(), 0.5);
        job.ffmpeg_path = ffmpeg;
        job.ffprobe_path = crate::conversion::get_ffprobe_path().ok();

        let state = CompressionState::new();
        start_compression(job, state.clone()).unwrap().join().unwrap();

        let outcome = state.take_outcome().unwrap().unwrap();
        // 0.5 MB over 30 s -> 140 kbps
        assert_eq!(outcome.bitrate_kbps, 140);
        assert_eq!(state.get_bitrate(), Some(140));

        let target = 0.5 * 1024.0 * 1024.0;
        let ratio = outcome.compressed_size as f64 / target;
        assert!((0.8..1.2).contains(&ratio), "Size ratio was {}", ratio);
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_then_wait_leaves_no_output() {
        use std::time::{Duration, Instant};

        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.mp3");
        std::fs::write(&input, vec![0u8; 4096]).unwrap();
        let output = dir.path().join("out.mp3");

        let mut job = job_for(input, output.clone(), 1.0);
        job.ffprobe_path = Some(test_fixtures::write_fake_tool(dir.path(), "ffprobe", "echo 60.0"));
        job.ffmpeg_path = test_fixtures::write_fake_tool(
            dir.path(),
            "ffmpeg",
            "echo partial > \"$out\"\nexec sleep 30",
        );

        let state = CompressionState::new();
        let handle = start_compression(job, state.clone()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while !output.exists() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(output.exists(), "Fake encoder never started");
        // 1 MB over 60 s
        assert_eq!(state.get_bitrate(), Some(140));

        state.cancel();
        assert!(state.wait_until_finished(Duration::from_secs(5)));
        assert!(!output.exists(), "Partial output should be removed");
        assert_eq!(state.get_stage(), CompressionStage::Cancelled);
        handle.join().unwrap();
    }
}
