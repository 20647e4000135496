//! CompressorView component - The main application view
//!
//! Root view of the application, containing:
//! - Header
//! - Source file panel, target size field and save location panel
//! - Status bar with the Compress / Cancel buttons

mod compression;
mod files;
mod input;
mod render;
#[cfg(test)]
mod tests;

use gpui::{Context, FocusHandle};
use std::path::{Path, PathBuf};

use crate::audio::{is_mp3_file, read_source_info, with_mp3_extension, SourceInfo};
use crate::core::{
    calculate_bitrate, format_megabytes, parse_target_size, CompressionOutcome,
    CompressionRequest, CompressionStage, CompressionState, RequestError,
};

/// Longest target size text accepted from the keyboard
const MAX_TARGET_SIZE_LEN: usize = 10;

/// The main compressor view
pub struct CompressorView {
    /// Source MP3 chosen by the user
    pub(crate) input_path: Option<PathBuf>,
    /// Size of the source in bytes
    pub(crate) input_size: Option<u64>,
    /// Audio properties of the source (None if lofty could not read them)
    pub(crate) source_info: Option<SourceInfo>,
    /// Where the compressed copy will be written
    pub(crate) output_path: Option<PathBuf>,
    /// Contents of the target size field (megabytes)
    pub(crate) target_size_text: String,
    /// State shared with the worker thread
    pub(crate) compression_state: CompressionState,
    /// Whether the completion polling loop is running
    pub(crate) is_polling: bool,
    /// Focus handle for receiving keys and actions (None in tests)
    pub(crate) focus_handle: Option<FocusHandle>,
    /// Whether we need to grab initial focus (for menu items to work)
    pub(crate) needs_initial_focus: bool,
    /// Whether we've subscribed to appearance changes
    pub(crate) appearance_subscription_set: bool,
    /// Whether we've subscribed to bounds changes (for saving window state)
    pub(crate) bounds_subscription_set: bool,
    /// Error dialog to show on next render (title, message)
    pub(crate) pending_error_message: Option<(String, String)>,
    /// Info dialog to show on next render (title, message)
    pub(crate) pending_info_message: Option<(String, String)>,
}

impl CompressorView {
    pub fn new(
        cx: &mut Context<Self>,
        initial_target_size: Option<String>,
        compression_state: CompressionState,
    ) -> Self {
        let mut view = Self::with_focus(Some(cx.focus_handle()));
        view.target_size_text = sanitize_target_size(initial_target_size.as_deref());
        view.compression_state = compression_state;
        view
    }

    /// Create a view for testing (without GPUI context)
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        let mut view = Self::with_focus(None);
        view.needs_initial_focus = false;
        view
    }

    fn with_focus(focus_handle: Option<FocusHandle>) -> Self {
        Self {
            input_path: None,
            input_size: None,
            source_info: None,
            output_path: None,
            target_size_text: String::new(),
            compression_state: CompressionState::new(),
            is_polling: false,
            focus_handle,
            needs_initial_focus: true,
            appearance_subscription_set: false,
            bounds_subscription_set: false,
            pending_error_message: None,
            pending_info_message: None,
        }
    }

    /// Select the source file
    ///
    /// Rejects anything that isn't an MP3. Audio properties are optional;
    /// the size is not.
    pub fn set_input_file(&mut self, path: PathBuf) -> Result<(), String> {
        if !is_mp3_file(&path) {
            return Err(format!("{} is not an MP3 file.", path.display()));
        }

        let size = std::fs::metadata(&path)
            .map_err(|e| format!("Could not read {}: {}", path.display(), e))?
            .len();

        self.source_info = match read_source_info(&path) {
            Ok(info) => Some(info),
            Err(e) => {
                log::warn!("Could not read audio properties of {}: {}", path.display(), e);
                None
            }
        };

        log::info!("Selected source: {} ({} bytes)", path.display(), size);
        self.input_size = Some(size);
        self.input_path = Some(path);
        Ok(())
    }

    /// Select the save location, adding `.mp3` if the user left it off
    pub fn set_output_file(&mut self, path: PathBuf) {
        let path = with_mp3_extension(&path);
        log::info!("Selected save location: {}", path.display());
        self.output_path = Some(path);
    }

    /// Append a typed character to the target size field
    ///
    /// Accepts digits and a single decimal separator. Returns true if the
    /// text changed.
    pub fn push_target_char(&mut self, c: char) -> bool {
        if self.target_size_text.len() >= MAX_TARGET_SIZE_LEN {
            return false;
        }
        let is_separator = c == '.' || c == ',';
        if is_separator && self.target_size_text.contains(['.', ',']) {
            return false;
        }
        if !c.is_ascii_digit() && !is_separator {
            return false;
        }
        self.target_size_text.push(c);
        true
    }

    /// Remove the last character of the target size field
    pub fn pop_target_char(&mut self) -> bool {
        self.target_size_text.pop().is_some()
    }

    /// Bitrate the current inputs would produce, if it can be known yet
    pub fn estimated_bitrate(&self) -> Option<u32> {
        let duration = self.source_info.as_ref().map(|i| i.duration)?;
        let target = parse_target_size(&self.target_size_text).ok()?;
        calculate_bitrate(target, duration).ok()
    }

    /// Validate the current selections
    pub fn build_request(&self) -> Result<CompressionRequest, RequestError> {
        CompressionRequest::validate(
            self.input_path.as_deref(),
            &self.target_size_text,
            self.output_path.as_deref(),
        )
    }

    pub fn is_compressing(&self) -> bool {
        self.compression_state.is_running()
    }

    /// Text for the status bar
    pub fn status_text(&self) -> String {
        let stage = self.compression_state.get_stage();
        match (stage, self.compression_state.get_bitrate()) {
            (CompressionStage::Encoding, Some(bitrate)) => {
                format!("{} ({} kbps)", stage.display_text(), bitrate)
            }
            _ => stage.display_text().to_string(),
        }
    }

    /// Check the worker for a finished run. Returns true once the run is over.
    pub fn poll_compression(&mut self) -> bool {
        if self.compression_state.is_running() {
            return false;
        }
        if let Some(result) = self.compression_state.take_outcome() {
            self.handle_outcome(result);
        }
        true
    }

    /// Queue the dialog describing a finished run
    pub(crate) fn handle_outcome(&mut self, result: Result<CompressionOutcome, String>) {
        match result {
            Ok(outcome) => {
                self.pending_info_message = Some(("Success".to_string(), success_message(&outcome)));
            }
            Err(_) if self.compression_state.get_stage() == CompressionStage::Cancelled => {
                self.pending_info_message = Some((
                    "Cancelled".to_string(),
                    "Compression was cancelled.".to_string(),
                ));
            }
            Err(e) => {
                self.pending_error_message =
                    Some(("Error".to_string(), format!("Compression failed:\n\n{}", e)));
            }
        }
    }

    /// Queue an error dialog
    pub(crate) fn show_error(&mut self, title: &str, message: impl Into<String>) {
        self.pending_error_message = Some((title.to_string(), message.into()));
    }

    /// Starting directory and file name for the save picker
    pub(crate) fn save_dialog_defaults(&self, last_save_dir: Option<&Path>) -> (PathBuf, String) {
        let dir = self
            .output_path
            .as_deref()
            .and_then(Path::parent)
            .or_else(|| self.input_path.as_deref().and_then(Path::parent))
            .map(Path::to_path_buf)
            .or_else(|| last_save_dir.map(Path::to_path_buf))
            .unwrap_or_else(|| dirs::document_dir().unwrap_or_else(|| PathBuf::from(".")));

        let name = match &self.input_path {
            Some(input) => crate::audio::default_output_name(input),
            None => "compressed.mp3".to_string(),
        };

        (dir, name)
    }
}

/// Body of the success dialog
pub(crate) fn success_message(outcome: &CompressionOutcome) -> String {
    format!(
        "File compressed successfully:\n\n\
         Original size: {}\n\
         Compressed size: {}\n\
         Bitrate: {} kbps\n\
         Saved to: {}",
        format_megabytes(outcome.original_size),
        format_megabytes(outcome.compressed_size),
        outcome.bitrate_kbps,
        outcome.output_path.display()
    )
}

/// Keep only a persisted target size that still parses
fn sanitize_target_size(text: Option<&str>) -> String {
    match text {
        Some(t) if parse_target_size(t).is_ok() && t.len() <= MAX_TARGET_SIZE_LEN => t.to_string(),
        _ => String::new(),
    }
}
