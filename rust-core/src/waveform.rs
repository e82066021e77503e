//! Multi-channel sample buffer handed to the engine

use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Waveform samples, one row per channel and one column per sample
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    data: Array2<f64>,
    sample_rate: f64,
}

impl Waveform {
    pub fn new(data: Array2<f64>, sample_rate: f64) -> Self {
        Self { data, sample_rate }
    }

    /// Single-channel waveform
    pub fn mono(samples: Vec<f64>, sample_rate: f64) -> Self {
        Self::new(Array1::from(samples).insert_axis(Axis(0)), sample_rate)
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn num_channels(&self) -> usize {
        self.data.nrows()
    }

    pub fn num_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate > 0.0 {
            self.num_samples() as f64 / self.sample_rate
        } else {
            0.0
        }
    }

    pub fn channel(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.num_channels()).then(|| self.data.row(index))
    }
}
