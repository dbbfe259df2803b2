//! Error types shared across the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing YOLO label files.
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Cannot read dimensions of {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image {path:?} has zero width or height")]
    EmptyImage { path: PathBuf },
}

impl LabelError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

/// Errors from the detection backend.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// No inference backend is available in this build.
    #[error("Detection backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Failed to load model from {path:?}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Inference failed on {path:?}: {message}")]
    Inference { path: PathBuf, message: String },
}

/// Errors from session operations that touch the disk.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No image is open")]
    NoImage,

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config value: {0}")]
    Invalid(String),
}
