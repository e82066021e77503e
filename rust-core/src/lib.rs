//! STFT Stats - short-time Fourier statistics of speech waveforms
//!
//! Frames a waveform, windows each frame, takes its real FFT and projects the
//! spectrum to raw complex values, magnitudes or phase angles. The `audio`
//! module holds the WAV/archive plumbing used by the `compute-stft-stats` tool.

pub mod audio;
pub mod error;
pub mod spectrum;
pub mod waveform;

pub use error::{ComputeError, ConfigError, InputError, IoError, RepresentationError};
pub use spectrum::{
    Representation, Representations, SpectralFeatures, StftComputer, StftOptions, WindowType,
};
pub use waveform::Waveform;
