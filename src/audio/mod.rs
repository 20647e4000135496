// Audio module - MP3 detection and duration/metadata probing

pub mod detection;
pub mod metadata;

pub use detection::{default_output_name, is_mp3_file, with_mp3_extension};
pub use metadata::{probe_duration, read_source_info, SourceInfo};
