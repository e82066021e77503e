//! Short-time spectral analysis: framing, windowing, FFT and projection

pub mod analysis;
pub mod fft;
pub mod framing;
pub mod options;
pub mod projection;
pub mod windowing;
pub mod windows;

pub use analysis::{SpectralFeatures, StftComputer};
pub use fft::{ComplexFftTransform, RealFftTransform, SpectralTransform};
pub use options::{
    ComplexLayout, EdgePolicy, PadAlignment, PadMode, StftOptions, TransformBackend,
    TransformLength,
};
pub use projection::{Representation, Representations};
pub use windows::{generate_window, WindowType};
