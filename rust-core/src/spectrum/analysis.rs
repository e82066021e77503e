//! Short-time Fourier transform engine
//!
//! Combines framing, windowing, the FFT backend and projection into a single
//! `compute` call. Everything the engine owns is immutable after construction;
//! frame and spectrum scratch is allocated per call, so one instance can serve
//! several threads at once.

use super::fft::{ComplexFftTransform, RealFftTransform, SpectralTransform};
use super::framing::Framer;
use super::options::{StftOptions, TransformBackend};
use super::projection::{Projector, Representation, Representations};
use super::windowing::Windower;
use crate::error::{ComputeError, ConfigError, InputError, TransformError};
use crate::waveform::Waveform;
use ndarray::Array2;
use num_complex::Complex;
use std::borrow::Cow;

/// Feature matrices produced by one `compute` call
///
/// Requested representations are `Some` (possibly with zero rows), the rest `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectralFeatures {
    pub stft: Option<Array2<f64>>,
    pub spectra: Option<Array2<f64>>,
    pub angle: Option<Array2<f64>>,
}

impl SpectralFeatures {
    pub fn get(&self, representation: Representation) -> Option<&Array2<f64>> {
        match representation {
            Representation::Stft => self.stft.as_ref(),
            Representation::Spectra => self.spectra.as_ref(),
            Representation::Angle => self.angle.as_ref(),
        }
    }

    pub fn take(&mut self, representation: Representation) -> Option<Array2<f64>> {
        match representation {
            Representation::Stft => self.stft.take(),
            Representation::Spectra => self.spectra.take(),
            Representation::Angle => self.angle.take(),
        }
    }

    fn slot(&mut self, representation: Representation) -> &mut Option<Array2<f64>> {
        match representation {
            Representation::Stft => &mut self.stft,
            Representation::Spectra => &mut self.spectra,
            Representation::Angle => &mut self.angle,
        }
    }

    /// Frame count of the populated matrices (0 when nothing was requested)
    pub fn num_frames(&self) -> usize {
        Representation::ALL
            .iter()
            .find_map(|r| self.get(*r))
            .map_or(0, |m| m.nrows())
    }

    /// True when no representation was requested
    pub fn is_empty(&self) -> bool {
        self.stft.is_none() && self.spectra.is_none() && self.angle.is_none()
    }
}

/// Short-time Fourier transform computer
pub struct StftComputer {
    options: StftOptions,
    framer: Framer,
    windower: Windower,
    transform: Box<dyn SpectralTransform>,
    projector: Projector,
}

impl StftComputer {
    /// Validate options and precompute the window and FFT plan
    pub fn new(options: StftOptions) -> Result<Self, ConfigError> {
        options.validate()?;

        let fft_size = options.fft_length();
        let transform: Box<dyn SpectralTransform> = match options.backend {
            TransformBackend::Realfft => Box::new(RealFftTransform::new(fft_size)),
            TransformBackend::Rustfft => Box::new(ComplexFftTransform::new(fft_size)),
        };

        log::debug!(
            "STFT: frame {} shift {} window {} fft {} ({}) edges {}",
            options.frame_length,
            options.frame_shift,
            options.window,
            fft_size,
            options.backend,
            options.edge_policy,
        );

        Ok(Self {
            framer: Framer::new(&options),
            windower: Windower::new(options.window, options.frame_length),
            projector: Projector::new(&options),
            transform,
            options,
        })
    }

    /// Compute the requested representations of channel 0 of `waveform`
    ///
    /// Other channels are ignored. A waveform with no channels or no samples
    /// yields an `InputError`; a waveform too short for a single frame yields
    /// matrices with zero rows.
    pub fn compute(
        &self,
        waveform: &Waveform,
        request: Representations,
    ) -> Result<SpectralFeatures, ComputeError> {
        let channel = waveform.channel(0).ok_or(InputError::NoChannels)?;
        if channel.is_empty() {
            return Err(InputError::EmptyWaveform.into());
        }

        let samples = match channel.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(channel.to_vec()),
        };

        Ok(self.compute_samples(&samples, request)?)
    }

    /// Compute the requested representations of a mono signal
    pub fn compute_samples(
        &self,
        samples: &[f64],
        request: Representations,
    ) -> Result<SpectralFeatures, TransformError> {
        let num_frames = self.framer.num_frames(samples.len());
        let num_bins = self.num_bins();

        let mut features = SpectralFeatures::default();
        for representation in request.iter() {
            *features.slot(representation) =
                Some(Array2::zeros((num_frames, representation.width(num_bins))));
        }

        if request.is_empty() || num_frames == 0 {
            return Ok(features);
        }

        let mut frame = vec![0.0; self.fft_length()];
        let mut spectrum = vec![Complex::new(0.0, 0.0); num_bins];
        let mut scratch = vec![Complex::new(0.0, 0.0); self.transform.scratch_len()];

        for index in 0..num_frames {
            // The FFT clobbers its input, so the zero padding is restored each frame
            frame.fill(0.0);
            self.framer.extract(samples, index, &mut frame);
            self.windower.apply_inplace(&mut frame);
            self.transform.process(&mut frame, &mut spectrum, &mut scratch)?;

            for representation in request.iter() {
                if let Some(matrix) = features.slot(representation) {
                    self.projector
                        .project(representation, &spectrum, matrix.row_mut(index));
                }
            }
        }

        Ok(features)
    }

    pub fn options(&self) -> &StftOptions {
        &self.options
    }

    /// Transform length N
    pub fn fft_length(&self) -> usize {
        self.transform.fft_size()
    }

    /// Number of frequency bins, N/2 + 1
    pub fn num_bins(&self) -> usize {
        self.transform.num_bins()
    }

    /// Columns per frame of `representation`
    pub fn output_dim(&self, representation: Representation) -> usize {
        representation.width(self.num_bins())
    }

    /// Number of frames for a signal of `num_samples` samples
    pub fn num_frames(&self, num_samples: usize) -> usize {
        self.framer.num_frames(num_samples)
    }

    /// Bin center frequencies in Hz at the configured sample rate
    pub fn bin_frequencies(&self) -> Vec<f64> {
        self.transform.frequency_axis(self.options.sample_rate)
    }

    pub fn window(&self) -> &[f64] {
        self.windower.coefficients()
    }
}
