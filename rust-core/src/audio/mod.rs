//! Waveform input, feature output and the extraction driver

pub mod input;
pub mod output;
pub mod processor;
pub mod specifier;
pub mod table;

pub use input::{decode_bytes, read_command, read_wav};
pub use output::{write_matrix, write_matrix_file, ArkWriter};
pub use processor::{BatchSummary, FeatureExtractor, RecordError};
pub use specifier::{Rspecifier, WaveTable, Wspecifier};
pub use table::{ArkWaveReader, ScpReader, WaveEntry, WaveSource};
