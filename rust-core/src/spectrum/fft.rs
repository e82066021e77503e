//! FFT backends for real-valued frames
//!
//! The engine only talks to [`SpectralTransform`]: a real frame of length N goes
//! in, N/2 + 1 complex bins come out. Plans are immutable and shared; every
//! mutable buffer is supplied by the caller.

use crate::error::TransformError;
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Forward transform of one real frame
pub trait SpectralTransform: Send + Sync {
    /// Transform length N
    fn fft_size(&self) -> usize;

    /// Number of complex scratch values `process` needs
    fn scratch_len(&self) -> usize;

    /// Transform `input` (length N, clobbered) into `output` (length N/2 + 1)
    fn process(
        &self,
        input: &mut [f64],
        output: &mut [Complex<f64>],
        scratch: &mut [Complex<f64>],
    ) -> Result<(), TransformError>;

    /// Number of frequency bins (N/2 + 1 for a real FFT)
    fn num_bins(&self) -> usize {
        self.fft_size() / 2 + 1
    }

    /// Frequency of each bin in Hz: k * sample_rate / N
    fn frequency_axis(&self, sample_rate: f64) -> Vec<f64> {
        let n = self.fft_size() as f64;
        (0..self.num_bins())
            .map(|bin| bin as f64 * sample_rate / n)
            .collect()
    }
}

/// Real-input FFT using realfft
pub struct RealFftTransform {
    fft_size: usize,
    r2c: Arc<dyn RealToComplex<f64>>,
}

impl RealFftTransform {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        Self { fft_size, r2c }
    }
}

impl SpectralTransform for RealFftTransform {
    fn fft_size(&self) -> usize {
        self.fft_size
    }

    fn scratch_len(&self) -> usize {
        self.r2c.get_scratch_len()
    }

    fn process(
        &self,
        input: &mut [f64],
        output: &mut [Complex<f64>],
        scratch: &mut [Complex<f64>],
    ) -> Result<(), TransformError> {
        self.r2c
            .process_with_scratch(input, output, scratch)
            .map_err(|e| TransformError::BufferLength(e.to_string()))
    }
}

/// Full complex FFT using rustfft, keeping only the non-redundant half
pub struct ComplexFftTransform {
    fft_size: usize,
    fft: Arc<dyn Fft<f64>>,
}

impl ComplexFftTransform {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self { fft_size, fft }
    }
}

impl SpectralTransform for ComplexFftTransform {
    fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Complex copy of the frame followed by rustfft's in-place scratch
    fn scratch_len(&self) -> usize {
        self.fft_size + self.fft.get_inplace_scratch_len()
    }

    fn process(
        &self,
        input: &mut [f64],
        output: &mut [Complex<f64>],
        scratch: &mut [Complex<f64>],
    ) -> Result<(), TransformError> {
        if input.len() != self.fft_size {
            return Err(TransformError::BufferLength(format!(
                "input has {} samples, expected {}",
                input.len(),
                self.fft_size
            )));
        }
        if output.len() != self.num_bins() {
            return Err(TransformError::BufferLength(format!(
                "output has {} bins, expected {}",
                output.len(),
                self.num_bins()
            )));
        }
        if scratch.len() < self.scratch_len() {
            return Err(TransformError::BufferLength(format!(
                "scratch has {} values, expected {}",
                scratch.len(),
                self.scratch_len()
            )));
        }

        let (buffer, fft_scratch) = scratch.split_at_mut(self.fft_size);
        for (c, &x) in buffer.iter_mut().zip(input.iter()) {
            *c = Complex::new(x, 0.0);
        }

        self.fft.process_with_scratch(buffer, fft_scratch);
        output.copy_from_slice(&buffer[..output.len()]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn run(transform: &dyn SpectralTransform, signal: &[f64]) -> Vec<Complex<f64>> {
        let mut input = vec![0.0; transform.fft_size()];
        input[..signal.len()].copy_from_slice(signal);
        let mut output = vec![Complex::new(0.0, 0.0); transform.num_bins()];
        let mut scratch = vec![Complex::new(0.0, 0.0); transform.scratch_len()];

        transform
            .process(&mut input, &mut output, &mut scratch)
            .unwrap();
        output
    }

    /// Direct O(N^2) DFT of the non-redundant half
    fn naive_dft(signal: &[f64], n: usize) -> Vec<Complex<f64>> {
        (0..n / 2 + 1)
            .map(|k| {
                signal
                    .iter()
                    .enumerate()
                    .map(|(t, &x)| {
                        let angle = -2.0 * PI * (k * t) as f64 / n as f64;
                        Complex::new(x * angle.cos(), x * angle.sin())
                    })
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_fft_dc_signal() {
        let fft = RealFftTransform::new(1024);

        // DC signal (constant), zero-padded to the FFT size
        let spectrum = run(&fft, &vec![1.0; 100]);

        assert_eq!(spectrum.len(), 513);
        assert!((spectrum[0].re - 100.0).abs() < 1e-9);
        assert!(spectrum[0].im.abs() < 1e-9);
    }

    #[test]
    fn test_backends_match_naive_dft() {
        let signal: Vec<f64> = (0..300)
            .map(|n| (0.05 * n as f64).sin() + 0.3 * (0.31 * n as f64).cos())
            .collect();

        for n in [300, 512] {
            let expected = naive_dft(&signal, n);
            let backends: [Box<dyn SpectralTransform>; 2] = [
                Box::new(RealFftTransform::new(n)),
                Box::new(ComplexFftTransform::new(n)),
            ];

            for backend in backends.iter() {
                let spectrum = run(backend.as_ref(), &signal);
                assert_eq!(spectrum.len(), n / 2 + 1);
                for (a, b) in spectrum.iter().zip(expected.iter()) {
                    assert!((a - b).norm() < 1e-8, "n={n}: {a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn test_frequency_axis() {
        let fft = RealFftTransform::new(512);
        let freqs = fft.frequency_axis(16000.0);

        assert_eq!(freqs.len(), 257);
        assert_eq!(freqs[0], 0.0); // DC
        assert_eq!(freqs[1], 31.25);
        assert!((freqs[256] - 8000.0).abs() < 1e-10); // Nyquist
    }

    #[test]
    fn test_buffer_length_mismatch() {
        let fft = ComplexFftTransform::new(64);
        let mut input = vec![0.0; 32];
        let mut output = vec![Complex::new(0.0, 0.0); 33];
        let mut scratch = vec![Complex::new(0.0, 0.0); fft.scratch_len()];

        assert!(fft.process(&mut input, &mut output, &mut scratch).is_err());

        let real = RealFftTransform::new(64);
        let mut scratch = vec![Complex::new(0.0, 0.0); real.scratch_len()];
        assert!(real.process(&mut input, &mut output, &mut scratch).is_err());
    }
}
