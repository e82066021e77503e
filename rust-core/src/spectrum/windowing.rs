//! Windowing of analysis frames
//!
//! Applies windows to time-domain frames before the FFT to reduce spectral leakage

use super::windows::{generate_window, WindowType};

/// Precomputed window for a fixed frame length
///
/// Coefficients are generated once and shared by every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Windower {
    window_type: WindowType,
    coefficients: Vec<f64>,
}

impl Windower {
    /// Create windower for frames of `frame_length` samples
    pub fn new(window_type: WindowType, frame_length: usize) -> Self {
        Self {
            window_type,
            coefficients: generate_window(window_type, frame_length),
        }
    }

    /// Apply window in-place
    ///
    /// Only the first `frame_length` samples are weighted; anything past that
    /// (FFT zero padding) is left untouched.
    pub fn apply_inplace(&self, frame: &mut [f64]) {
        for (s, w) in frame.iter_mut().zip(self.coefficients.iter()) {
            *s *= w;
        }
    }

    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}
