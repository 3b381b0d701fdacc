// Error types
//
// Failures from the theme subsystem. None of these are fatal to the UI:
// callers log them and fall back to a safe default (system preference,
// light scheme).

use std::io;
use thiserror::Error;

/// Errors raised by a preference store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The per-user config directory could not be determined
    #[error("cannot determine config directory")]
    NoConfigDir,

    /// Reading or writing the backing file failed
    #[error("preference file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The backing file exists but is not a JSON object of strings
    #[error("preference file is malformed: {0}")]
    Json(#[from] serde_json::Error),

    /// The store refuses writes (read-only medium, quota, denied access)
    #[error("preference store is unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while resolving the theme
#[derive(Debug, Clone, Error)]
pub enum ThemeError {
    /// No probe could report the OS color scheme
    #[error("OS color scheme is unavailable")]
    SchemeUnavailable,

    /// The color scheme override held something other than light/dark
    #[error("unrecognized color scheme value: {0:?}")]
    InvalidScheme(String),
}

/// Errors raised by the cursor animator lifecycle
#[derive(Debug, Error, PartialEq)]
pub enum AnimatorError {
    /// Mount was attempted without a live drawing area
    #[error("cannot mount into an empty viewport ({width}x{height})")]
    EmptyViewport { width: f32, height: f32 },
}
