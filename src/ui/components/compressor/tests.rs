//! Tests for CompressorView

use super::*;
use crate::audio::SourceInfo;
use crate::core::CompressionOutcome;
use std::path::PathBuf;
use tempfile::TempDir;

fn view_with_duration(duration: f64) -> CompressorView {
    let mut view = CompressorView::new_for_test();
    view.source_info = Some(SourceInfo {
        size: 10 * 1024 * 1024,
        duration,
        bitrate: Some(320),
        sample_rate: Some(44100),
        channels: Some(2),
    });
    view
}

#[test]
fn test_new_view_is_empty() {
    let view = CompressorView::new_for_test();
    assert!(view.input_path.is_none());
    assert!(view.output_path.is_none());
    assert!(view.target_size_text.is_empty());
    assert!(!view.is_compressing());
    assert_eq!(view.status_text(), "Ready");
}

#[test]
fn test_target_field_accepts_digits_and_one_separator() {
    let mut view = CompressorView::new_for_test();
    for c in "12.5".chars() {
        assert!(view.push_target_char(c));
    }
    assert!(!view.push_target_char('.'));
    assert!(!view.push_target_char(','));
    assert!(!view.push_target_char('x'));
    assert!(!view.push_target_char('-'));
    assert_eq!(view.target_size_text, "12.5");
}

#[test]
fn test_target_field_length_limit() {
    let mut view = CompressorView::new_for_test();
    for _ in 0..20 {
        view.push_target_char('9');
    }
    assert_eq!(view.target_size_text.len(), MAX_TARGET_SIZE_LEN);
}

#[test]
fn test_target_field_backspace() {
    let mut view = CompressorView::new_for_test();
    view.push_target_char('4');
    assert!(view.pop_target_char());
    assert!(!view.pop_target_char());
    assert!(view.target_size_text.is_empty());
}

#[test]
fn test_estimated_bitrate() {
    let mut view = view_with_duration(240.0);
    assert_eq!(view.estimated_bitrate(), None, "No target yet");

    view.target_size_text = "5".to_string();
    assert_eq!(view.estimated_bitrate(), Some(175));

    view.target_size_text = "0".to_string();
    assert_eq!(view.estimated_bitrate(), None);
}

#[test]
fn test_estimated_bitrate_needs_duration() {
    let mut view = CompressorView::new_for_test();
    view.target_size_text = "5".to_string();
    assert_eq!(view.estimated_bitrate(), None);
}

#[test]
fn test_set_input_rejects_non_mp3() {
    let mut view = CompressorView::new_for_test();
    let err = view.set_input_file(PathBuf::from("/music/song.flac")).unwrap_err();
    assert!(err.contains("not an MP3"));
    assert!(view.input_path.is_none());
}

#[test]
fn test_set_input_rejects_missing_file() {
    let mut view = CompressorView::new_for_test();
    assert!(view.set_input_file(PathBuf::from("/nonexistent/song.mp3")).is_err());
    assert!(view.input_path.is_none());
}

#[test]
fn test_set_input_accepts_unreadable_audio() {
    // Not real MP3 data: the size is still shown, audio properties are not
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.mp3");
    std::fs::write(&path, vec![0u8; 2048]).unwrap();

    let mut view = CompressorView::new_for_test();
    view.set_input_file(path.clone()).unwrap();

    assert_eq!(view.input_path, Some(path));
    assert_eq!(view.input_size, Some(2048));
    assert!(view.source_info.is_none());
}

#[test]
fn test_set_output_adds_extension() {
    let mut view = CompressorView::new_for_test();
    view.set_output_file(PathBuf::from("/tmp/smaller"));
    assert_eq!(view.output_path, Some(PathBuf::from("/tmp/smaller.mp3")));
}

#[test]
fn test_build_request_validation_order() {
    let mut view = CompressorView::new_for_test();
    assert_eq!(view.build_request().unwrap_err(), RequestError::NoInputFile);

    view.input_path = Some(PathBuf::from("/music/a.mp3"));
    assert!(matches!(
        view.build_request().unwrap_err(),
        RequestError::InvalidTargetSize(_)
    ));

    view.target_size_text = "3".to_string();
    assert_eq!(view.build_request().unwrap_err(), RequestError::NoOutputFile);

    view.output_path = Some(PathBuf::from("/music/b.mp3"));
    let request = view.build_request().unwrap();
    assert_eq!(request.target_size_mb, 3.0);
}

#[test]
fn test_save_dialog_defaults_use_source_directory() {
    let mut view = CompressorView::new_for_test();
    view.input_path = Some(PathBuf::from("/music/album/track.mp3"));

    let (dir, name) = view.save_dialog_defaults(Some(Path::new("/elsewhere")));
    assert_eq!(dir, PathBuf::from("/music/album"));
    assert_eq!(name, "track_compressed.mp3");
}

#[test]
fn test_save_dialog_defaults_fall_back_to_last_dir() {
    let view = CompressorView::new_for_test();
    let (dir, name) = view.save_dialog_defaults(Some(Path::new("/elsewhere")));
    assert_eq!(dir, PathBuf::from("/elsewhere"));
    assert_eq!(name, "compressed.mp3");
}

#[test]
fn test_poll_while_running_does_nothing() {
    let mut view = CompressorView::new_for_test();
    assert!(view.compression_state.try_begin());
    assert!(!view.poll_compression());
    assert!(view.pending_info_message.is_none());
    assert!(view.pending_error_message.is_none());
}

#[test]
fn test_poll_success_queues_info_dialog() {
    let mut view = CompressorView::new_for_test();
    view.compression_state.try_begin();
    view.compression_state.finish(Ok(CompressionOutcome {
        input_path: PathBuf::from("/music/a.mp3"),
        output_path: PathBuf::from("/music/a_compressed.mp3"),
        bitrate_kbps: 128,
        original_size: 8 * 1024 * 1024,
        compressed_size: 3 * 1024 * 1024,
    }));

    assert!(view.poll_compression());
    let (title, message) = view.pending_info_message.take().unwrap();
    assert_eq!(title, "Success");
    assert!(message.contains("Original size: 8.00 MB"));
    assert!(message.contains("Compressed size: 3.00 MB"));
    assert!(message.contains("Bitrate: 128 kbps"));
    assert!(message.contains("Saved to: /music/a_compressed.mp3"));
    assert!(view.pending_error_message.is_none());
}

#[test]
fn test_poll_failure_queues_error_dialog() {
    let mut view = CompressorView::new_for_test();
    view.compression_state.try_begin();
    view.compression_state
        .finish(Err("ffmpeg exited with status 1: Invalid data".to_string()));

    assert!(view.poll_compression());
    let (title, message) = view.pending_error_message.take().unwrap();
    assert_eq!(title, "Error");
    assert!(message.contains("Invalid data"));
}

#[test]
fn test_poll_cancelled_is_not_an_error() {
    let mut view = CompressorView::new_for_test();
    view.compression_state.try_begin();
    view.compression_state.cancel();
    view.compression_state
        .finish(Err("Compression cancelled".to_string()));

    assert!(view.poll_compression());
    assert!(view.pending_error_message.is_none());
    let (title, _) = view.pending_info_message.take().unwrap();
    assert_eq!(title, "Cancelled");
}

#[test]
fn test_status_text_shows_bitrate_while_encoding() {
    let view = CompressorView::new_for_test();
    view.compression_state.try_begin();
    view.compression_state.set_bitrate(96);
    view.compression_state.set_stage(CompressionStage::Encoding);
    assert_eq!(view.status_text(), "Compressing... (96 kbps)");
}

#[test]
fn test_sanitize_target_size() {
    assert_eq!(sanitize_target_size(Some("4.5")), "4.5");
    assert_eq!(sanitize_target_size(Some("-1")), "");
    assert_eq!(sanitize_target_size(Some("abc")), "");
    assert_eq!(sanitize_target_size(None), "");
}

#[test]
fn test_channel_label() {
    assert_eq!(super::render::channel_label(1), "mono");
    assert_eq!(super::render::channel_label(2), "stereo");
    assert_eq!(super::render::channel_label(6), "6 channels");
}
