//! Error types for the STFT engine and its I/O boundary

use std::path::PathBuf;
use thiserror::Error;

/// Invalid engine configuration, raised before any waveform is processed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("frame length must be positive")]
    ZeroFrameLength,

    #[error("frame shift must be positive")]
    ZeroFrameShift,

    #[error("transform length must be positive")]
    ZeroTransformLength,

    #[error("frame length {frame_length} exceeds transform length {fft_length}")]
    FrameExceedsTransform { frame_length: usize, fft_length: usize },

    #[error("unknown window type: {0}")]
    UnknownWindow(String),

    #[error("unknown {option} value: {value}")]
    UnknownValue { option: &'static str, value: String },

    #[error("failed to read config file {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },
}

/// Waveform the engine cannot produce features for
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("waveform has no channels")]
    NoChannels,

    #[error("waveform has no samples")]
    EmptyWaveform,
}

/// Unrecognized output kind, rejected before entering the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown output kind {0:?} (expected \"stft\", \"spectra\" or \"angle\")")]
pub struct RepresentationError(pub String);

/// Failure inside a transform backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("transform buffer length mismatch: {0}")]
    BufferLength(String),
}

/// Per-call failure of the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Waveform/feature file and archive errors
#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error on {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode WAV {path}: {source}")]
    Wav {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("unsupported WAV format in {path}: {reason}")]
    UnsupportedWav { path: String, reason: String },

    #[error("{path}:{line}: malformed scp line {content:?}")]
    MalformedScp {
        path: String,
        line: usize,
        content: String,
    },

    #[error("{path}: malformed wave archive: {reason}")]
    MalformedArk { path: String, reason: String },

    #[error("command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("invalid specifier {0:?}")]
    InvalidSpecifier(String),

    #[error("matrix too large for the feature format: {rows}x{cols}")]
    MatrixTooLarge { rows: usize, cols: usize },
}

impl IoError {
    pub(crate) fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        IoError::File {
            path: path.into(),
            source,
        }
    }
}
