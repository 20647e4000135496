//! Core application logic and state
//!
//! This module contains:
//! - Bitrate calculation for size-targeted compression
//! - Validation of compression requests
//! - Application-wide settings and shared compression state
//! - Size and duration formatting

mod bitrate;
mod format;
mod request;
mod state;

pub use bitrate::{
    bitrate_arg, calculate_bitrate, estimate_output_bytes, is_within_encoder_range,
    LAME_MAX_BITRATE, LAME_MIN_BITRATE,
};
pub use format::{file_size_label, format_duration, format_megabytes, path_label};
pub use request::{parse_target_size, CompressionRequest, RequestError};
pub use state::{
    AppSettings, CompressionOutcome, CompressionStage, CompressionState, WindowState,
};
