use std::path::Path;

/// Check if a file is an MP3 based on its extension
pub fn is_mp3_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

/// Ensure a save path ends in `.mp3`, appending it when the user left the extension off
pub fn with_mp3_extension(path: &Path) -> std::path::PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("mp3")
    }
}

/// Default name for the compressed copy: "<stem>_compressed.mp3"
pub fn default_output_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    format!("{}_compressed.mp3", stem)
}
