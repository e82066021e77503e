//! Feature extraction driver - keyed batch and single-file modes
//!
//! Per-record failures (unreadable audio, empty waveforms, waveforms shorter
//! than one frame) are logged and skipped; only failures reading the table
//! itself or writing the archive abort a batch.
//! Records are decoded and transformed in parallel chunks on the rayon pool
//! and written in input order.

use super::output::{write_matrix_file, ArkWriter};
use super::table::{WaveEntry, WaveSource};
use crate::error::{ComputeError, IoError};
use crate::spectrum::{Representation, StftComputer};
use crate::waveform::Waveform;
use ndarray::Array2;
use rayon::prelude::*;
use thiserror::Error;

/// Records decoded and transformed together before writing
const CHUNK_SIZE: usize = 64;

/// Progress is logged every this many records
const PROGRESS_INTERVAL: usize = 100;

/// Why a single waveform produced no features
#[derive(Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    Read(#[from] IoError),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error("{num_samples} samples is too short for a single frame")]
    NoFrames { num_samples: usize },
}

/// Outcome of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
}

impl BatchSummary {
    /// A batch succeeds when at least one record produced features
    pub fn is_success(&self) -> bool {
        self.succeeded > 0
    }
}

/// Computes one representation per waveform with a shared engine
pub struct FeatureExtractor {
    computer: StftComputer,
    output: Representation,
    normalize: bool,
}

impl FeatureExtractor {
    pub fn new(computer: StftComputer, output: Representation, normalize: bool) -> Self {
        Self {
            computer,
            output,
            normalize,
        }
    }

    pub fn computer(&self) -> &StftComputer {
        &self.computer
    }

    pub fn output(&self) -> Representation {
        self.output
    }

    /// Feature matrix for an in-memory waveform
    pub fn extract(&self, waveform: &Waveform) -> Result<Array2<f64>, RecordError> {
        let mut features = self.computer.compute(waveform, self.output.into())?;
        match features.take(self.output) {
            Some(matrix) if matrix.nrows() > 0 => Ok(matrix),
            _ => Err(RecordError::NoFrames {
                num_samples: waveform.num_samples(),
            }),
        }
    }

    /// Read and transform one waveform, returning its channel count and features
    fn extract_source(&self, source: &WaveSource) -> Result<(usize, Array2<f64>), RecordError> {
        let waveform = source.read(self.normalize)?;
        let matrix = self.extract(&waveform)?;
        Ok((waveform.num_channels(), matrix))
    }

    /// Single-file mode: one WAV (path, `-` or `cmd |`) to a single matrix at `output`
    pub fn process_file(
        &self,
        input: &str,
        output: &str,
        binary: bool,
    ) -> Result<(), RecordError> {
        let source = WaveSource::parse(input);
        let (channels, matrix) = self.extract_source(&source)?;
        if channels != 1 {
            log::warn!("MULTI-CHANNEL input ({} channels), using channel 0", channels);
        }

        write_matrix_file(output, &matrix, binary)?;
        log::info!(
            "Done processing {} ({}x{} {})",
            source,
            matrix.nrows(),
            matrix.ncols(),
            self.output
        );
        Ok(())
    }

    /// Batch mode: transform every listed record and append it to `writer`
    ///
    /// Errors reading the listing itself or writing the archive are fatal.
    pub fn process_archive<I>(
        &self,
        entries: I,
        writer: &mut ArkWriter,
    ) -> Result<BatchSummary, IoError>
    where
        I: IntoIterator<Item = Result<WaveEntry, IoError>>,
    {
        let mut summary = BatchSummary::default();
        let mut entries = entries.into_iter();

        loop {
            let chunk = entries
                .by_ref()
                .take(CHUNK_SIZE)
                .collect::<Result<Vec<_>, _>>()?;
            if chunk.is_empty() {
                break;
            }

            let results: Vec<_> = chunk
                .par_iter()
                .map(|entry| self.extract_source(&entry.source))
                .collect();

            for (entry, result) in chunk.iter().zip(results) {
                match result {
                    Ok((channels, matrix)) => {
                        if channels != 1 {
                            log::warn!(
                                "{}: MULTI-CHANNEL ({} channels), using channel 0",
                                entry.key,
                                channels
                            );
                        }
                        writer.write(&entry.key, &matrix)?;

                        summary.succeeded += 1;
                        if summary.succeeded % PROGRESS_INTERVAL == 0 {
                            log::info!("Processed {} utterances", summary.succeeded);
                        }
                        log::debug!("Processed features for key {}", entry.key);
                    }
                    Err(e) => {
                        log::warn!("{}: skipped: {}", entry.key, e);
                        summary.skipped += 1;
                    }
                }
            }
        }

        log::info!(
            "Done {} utterances, {} skipped",
            summary.succeeded,
            summary.skipped
        );
        Ok(summary)
    }
}
