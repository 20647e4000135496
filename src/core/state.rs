//! Application state types
//!
//! Contains shared state types used across the application:
//! - AppSettings: Global application preferences
//! - WindowState: Last window position and size
//! - CompressionStage: Current stage of a compression run
//! - CompressionState: Thread-safe state shared with the worker thread

use gpui::Global;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Name of the per-user data directory
const APP_DIR_NAME: &str = "MP3 Compressor";

/// Get the app data directory (~/Library/Application Support/MP3 Compressor/)
fn get_app_data_dir() -> Result<PathBuf, String> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| "Could not determine data directory".to_string())?;

    let app_dir = data_dir.join(APP_DIR_NAME);

    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)
            .map_err(|e| format!("Failed to create app data directory: {}", e))?;
    }

    Ok(app_dir)
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, String> {
    if !path.exists() {
        return Err(format!("{} not found", path.display()));
    }

    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize {}: {}", path.display(), e))?;

    std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Application-wide settings
///
/// Persisted to ~/Library/Application Support/MP3 Compressor/app_settings.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Keep embedded cover art in the compressed file (it counts toward the size)
    #[serde(default)]
    pub keep_album_art: bool,
    /// Target size last entered by the user
    #[serde(default)]
    pub last_target_size: Option<String>,
    /// Directory of the last save location
    #[serde(default)]
    pub last_save_dir: Option<PathBuf>,
}

impl Global for AppSettings {}

impl AppSettings {
    const SETTINGS_FILE: &'static str = "app_settings.json";

    /// Load app settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let loaded = get_app_data_dir().and_then(|dir| Self::load_from(&dir.join(Self::SETTINGS_FILE)));
        match loaded {
            Ok(settings) => {
                log::debug!("Loaded app settings from disk");
                settings
            }
            Err(e) => {
                log::debug!("Using default app settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save app settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = get_app_data_dir()?.join(Self::SETTINGS_FILE);
        self.save_to(&path)?;
        log::debug!("Saved app settings to {:?}", path);
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        read_json(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        write_json(path, self)
    }
}

/// Window state for position/size persistence
///
/// Persisted to ~/Library/Application Support/MP3 Compressor/window_state.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            x: 100.0,
            y: 100.0,
            width: 460.0,
            height: 520.0,
        }
    }
}

impl WindowState {
    const STATE_FILE: &'static str = "window_state.json";

    /// Load window state from disk, or return defaults if not found
    pub fn load() -> Self {
        let loaded = get_app_data_dir().and_then(|dir| read_json::<Self>(&dir.join(Self::STATE_FILE)));
        match loaded {
            Ok(state) => {
                log::debug!(
                    "Loaded window state from disk: {}x{} at ({}, {})",
                    state.width, state.height, state.x, state.y
                );
                state
            }
            Err(e) => {
                log::debug!("Using default window state: {}", e);
                Self::default()
            }
        }
    }

    /// Save window state to disk
    pub fn save(&self) -> Result<(), String> {
        let path = get_app_data_dir()?.join(Self::STATE_FILE);
        write_json(&path, self)
    }
}

/// Current stage of a compression run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionStage {
    /// Nothing running
    Idle,
    /// Reading the source duration
    Probing,
    /// ffmpeg is encoding
    Encoding,
    /// Finished successfully
    Complete,
    /// Finished with an error
    Failed,
    /// Stopped by the user
    Cancelled,
}

impl CompressionStage {
    pub fn display_text(&self) -> &'static str {
        match self {
            CompressionStage::Idle => "Ready",
            CompressionStage::Probing => "Reading duration...",
            CompressionStage::Encoding => "Compressing...",
            CompressionStage::Complete => "Done",
            CompressionStage::Failed => "Failed",
            CompressionStage::Cancelled => "Cancelled",
        }
    }
}

/// Result of a successful compression
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionOutcome {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Bitrate passed to the encoder (kbps)
    pub bitrate_kbps: u32,
    /// Source size in bytes
    pub original_size: u64,
    /// Compressed size in bytes
    pub compressed_size: u64,
}

/// Shared state for tracking a compression run across threads
#[derive(Clone)]
pub struct CompressionState {
    /// Whether a run is in progress
    is_running: Arc<AtomicBool>,
    /// Whether cancellation has been requested
    cancel_requested: Arc<AtomicBool>,
    /// Current stage
    stage: Arc<Mutex<CompressionStage>>,
    /// Bitrate of the current run (0 until computed)
    bitrate: Arc<AtomicU32>,
    /// PID of the running ffmpeg process (for cancellation)
    running_pid: Arc<Mutex<Option<u32>>>,
    /// Result of the last finished run, taken by the UI
    outcome: Arc<Mutex<Option<Result<CompressionOutcome, String>>>>,
}

impl Global for CompressionState {}

impl Default for CompressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionState {
    pub fn new() -> Self {
        Self {
            is_running: Arc::new(AtomicBool::new(false)),
            cancel_requested: Arc::new(AtomicBool::new(false)),
            stage: Arc::new(Mutex::new(CompressionStage::Idle)),
            bitrate: Arc::new(AtomicU32::new(0)),
            running_pid: Arc::new(Mutex::new(None)),
            outcome: Arc::new(Mutex::new(None)),
        }
    }

    /// Mark a run as started. Returns false if one is already running.
    pub fn try_begin(&self) -> bool {
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        self.cancel_requested.store(false, Ordering::SeqCst);
        self.bitrate.store(0, Ordering::SeqCst);
        *self.outcome.lock().unwrap() = None;
        self.set_stage(CompressionStage::Probing);
        true
    }

    /// Record the result and mark the run finished
    pub fn finish(&self, result: Result<CompressionOutcome, String>) {
        let stage = match &result {
            Ok(_) => CompressionStage::Complete,
            Err(_) if self.is_cancelled() => CompressionStage::Cancelled,
            Err(_) => CompressionStage::Failed,
        };
        self.set_stage(stage);
        *self.outcome.lock().unwrap() = Some(result);
        self.is_running.store(false, Ordering::SeqCst);
    }

    /// Take the result of a finished run (None while running or if already taken)
    pub fn take_outcome(&self) -> Option<Result<CompressionOutcome, String>> {
        if self.is_running() {
            return None;
        }
        self.outcome.lock().unwrap().take()
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Block until the current run finishes or `timeout` passes.
    /// Returns true if nothing is running anymore.
    pub fn wait_until_finished(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_running() {
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        true
    }

    pub fn set_stage(&self, stage: CompressionStage) {
        *self.stage.lock().unwrap() = stage;
    }

    pub fn get_stage(&self) -> CompressionStage {
        *self.stage.lock().unwrap()
    }

    pub fn set_bitrate(&self, bitrate_kbps: u32) {
        self.bitrate.store(bitrate_kbps, Ordering::SeqCst);
    }

    /// Bitrate of the current run, if computed yet
    pub fn get_bitrate(&self) -> Option<u32> {
        match self.bitrate.load(Ordering::SeqCst) {
            0 => None,
            b => Some(b),
        }
    }

    /// Register the running ffmpeg process
    pub fn register_pid(&self, pid: u32) {
        *self.running_pid.lock().unwrap() = Some(pid);
    }

    /// Unregister the ffmpeg process (when it exits)
    pub fn unregister_pid(&self) {
        *self.running_pid.lock().unwrap() = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst)
    }

    /// Request cancellation and kill the running encoder, if any
    pub fn cancel(&self) {
        if !self.is_running() {
            return;
        }
        self.cancel_requested.store(true, Ordering::SeqCst);
        self.kill_running_process();
    }

    fn kill_running_process(&self) {
        let pid = self.running_pid.lock().unwrap().take();
        if let Some(pid) = pid {
            log::info!("Killing ffmpeg process {}", pid);
            #[cfg(unix)]
            unsafe {
                // SIGKILL for immediate termination
                libc::kill(pid as i32, libc::SIGKILL);
            }
            #[cfg(not(unix))]
            {
                // Without a kill-by-PID the encoder runs to completion and
                // the worker discards its output afterwards
                let _ = pid;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_outcome() -> CompressionOutcome {
        CompressionOutcome {
            input_path: PathBuf::from("/music/in.mp3"),
            output_path: PathBuf::from("/music/out.mp3"),
            bitrate_kbps: 128,
            original_size: 10_000_000,
            compressed_size: 4_000_000,
        }
    }

    #[test]
    fn test_settings_roundtrip_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app_settings.json");

        let settings = AppSettings {
            keep_album_art: true,
            last_target_size: Some("3.5".to_string()),
            last_save_dir: Some(PathBuf::from("/music")),
        };
        settings.save_to(&path).unwrap();

        assert_eq!(AppSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_settings_missing_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app_settings.json");
        std::fs::write(&path, "{}").unwrap();

        assert_eq!(AppSettings::load_from(&path).unwrap(), AppSettings::default());
    }

    #[test]
    fn test_settings_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(AppSettings::load_from(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_begin_is_exclusive() {
        let state = CompressionState::new();
        assert!(state.try_begin());
        assert!(!state.try_begin());
        assert_eq!(state.get_stage(), CompressionStage::Probing);

        state.finish(Ok(sample_outcome()));
        assert!(state.try_begin());
    }

    #[test]
    fn test_finish_success() {
        let state = CompressionState::new();
        state.try_begin();
        assert!(state.take_outcome().is_none(), "No outcome while running");

        state.finish(Ok(sample_outcome()));
        assert!(!state.is_running());
        assert_eq!(state.get_stage(), CompressionStage::Complete);
        assert_eq!(state.take_outcome(), Some(Ok(sample_outcome())));
        assert!(state.take_outcome().is_none(), "Outcome is taken once");
    }

    #[test]
    fn test_finish_failure() {
        let state = CompressionState::new();
        state.try_begin();
        state.finish(Err("ffmpeg exploded".to_string()));
        assert_eq!(state.get_stage(), CompressionStage::Failed);
        assert_eq!(state.take_outcome(), Some(Err("ffmpeg exploded".to_string())));
    }

    #[test]
    fn test_cancel_marks_cancelled() {
        let state = CompressionState::new();
        state.try_begin();
        state.cancel();
        assert!(state.is_cancelled());

        state.finish(Err("Compression cancelled".to_string()));
        assert_eq!(state.get_stage(), CompressionStage::Cancelled);
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let state = CompressionState::new();
        state.cancel();
        assert!(!state.is_cancelled());
    }

    #[test]
    fn test_bitrate_reset_on_begin() {
        let state = CompressionState::new();
        state.try_begin();
        state.set_bitrate(96);
        assert_eq!(state.get_bitrate(), Some(96));
        state.finish(Ok(sample_outcome()));

        state.try_begin();
        assert_eq!(state.get_bitrate(), None);
    }

    #[test]
    fn test_wait_until_finished_when_idle() {
        let state = CompressionState::new();
        assert!(state.wait_until_finished(Duration::ZERO));
    }

    #[test]
    fn test_wait_until_finished_waits_for_worker() {
        let state = CompressionState::new();
        assert!(state.try_begin());

        let worker_state = state.clone();
        let worker = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            worker_state.finish(Err("Compression cancelled".to_string()));
        });

        assert!(state.wait_until_finished(Duration::from_secs(5)));
        assert!(!state.is_running());
        worker.join().unwrap();
    }

    #[test]
    fn test_wait_until_finished_times_out() {
        let state = CompressionState::new();
        assert!(state.try_begin());
        assert!(!state.wait_until_finished(Duration::from_millis(30)));
        assert!(state.is_running());
    }
}
