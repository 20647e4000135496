//! Validation of a compression request before any work starts

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Why a compression request was rejected
///
/// Checked in this order: input file, target size, output location.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// No source MP3 has been selected
    NoInputFile,
    /// Target size text is not a number
    InvalidTargetSize(String),
    /// Target size parsed but is zero, negative or not finite
    NonPositiveTargetSize,
    /// No save location has been selected
    NoOutputFile,
    /// Save location is the source file itself
    OutputIsInput,
}

impl RequestError {
    /// Title for the error dialog
    pub fn title(&self) -> &'static str {
        "Error"
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NoInputFile => write!(f, "Please select an MP3 file."),
            RequestError::InvalidTargetSize(_) => write!(f, "Please enter a valid size."),
            RequestError::NonPositiveTargetSize => {
                write!(f, "The target size must be a positive number.")
            }
            RequestError::NoOutputFile => {
                write!(f, "Please choose where to save the compressed file.")
            }
            RequestError::OutputIsInput => write!(
                f,
                "The compressed file cannot overwrite the source file. Please choose another location."
            ),
        }
    }
}

impl std::error::Error for RequestError {}

/// A validated request, ready to hand to the worker thread
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Target size in binary megabytes
    pub target_size_mb: f64,
}

impl CompressionRequest {
    /// Validate the user's selections
    pub fn validate(
        input_path: Option<&Path>,
        target_size_text: &str,
        output_path: Option<&Path>,
    ) -> Result<Self, RequestError> {
        let input_path = input_path.ok_or(RequestError::NoInputFile)?;
        let target_size_mb = parse_target_size(target_size_text)?;
        let output_path = output_path.ok_or(RequestError::NoOutputFile)?;

        if is_same_file(input_path, output_path) {
            return Err(RequestError::OutputIsInput);
        }

        Ok(Self {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            target_size_mb,
        })
    }
}

/// Whether two paths name the same file on disk
///
/// Resolves `..`, symlinks and case-folding through the filesystem. A save
/// location that doesn't exist yet is resolved through its parent directory.
/// Falls back to comparing the paths as written.
fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Some(resolved);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}

/// Parse the target size field (megabytes)
///
/// Accepts surrounding whitespace and a comma as decimal separator.
pub fn parse_target_size(text: &str) -> Result<f64, RequestError> {
    let normalized = text.trim().replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| RequestError::InvalidTargetSize(text.to_string()))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(RequestError::NonPositiveTargetSize);
    }

    Ok(value)
}
