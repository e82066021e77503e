//! Waveform decoding: WAV files, stdin, in-memory blobs and piped commands
//!
//! Integer PCM is returned at its raw integer amplitude (16-bit audio spans
//! -32768..32767) unless normalization is requested, in which case samples are
//! scaled into [-1, 1). Float WAV data is passed through unchanged.

use crate::error::IoError;
use crate::waveform::Waveform;
use hound::{SampleFormat, WavReader};
use ndarray::Array2;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use std::process::{Command, Stdio};

/// Read a WAV file; `-` reads from stdin
pub fn read_wav(path: &Path, normalize: bool) -> Result<Waveform, IoError> {
    let name = path.display().to_string();
    let wav_error = |source| IoError::Wav {
        path: name.clone(),
        source,
    };

    if path == Path::new("-") {
        let reader = WavReader::new(BufReader::new(std::io::stdin().lock())).map_err(wav_error)?;
        return decode(reader, &name, normalize);
    }

    let reader = WavReader::open(path).map_err(wav_error)?;
    decode(reader, &name, normalize)
}

/// Decode a complete WAV file held in memory
pub fn decode_bytes(bytes: &[u8], name: &str, normalize: bool) -> Result<Waveform, IoError> {
    let reader = WavReader::new(Cursor::new(bytes)).map_err(|source| IoError::Wav {
        path: name.to_string(),
        source,
    })?;
    decode(reader, name, normalize)
}

/// Run `command` through `sh -c` and decode the WAV it writes to stdout
pub fn read_command(command: &str, normalize: bool) -> Result<Waveform, IoError> {
    let name = format!("{command} |");
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| IoError::Command {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(IoError::Command {
            command: command.to_string(),
            reason: output.status.to_string(),
        });
    }

    let mut bytes = output.stdout;
    clamp_chunk_sizes(&mut bytes);
    decode_bytes(&bytes, &name, normalize)
}

/// Shrink RIFF and `data` sizes that overrun the buffer
///
/// Writers streaming to a pipe cannot seek back to patch the header and leave
/// placeholder sizes (0xFFFFFFFF) behind; the data then runs to end of input.
fn clamp_chunk_sizes(bytes: &mut [u8]) {
    if bytes.len() < 12 || &bytes[..4] != b"RIFF" {
        return;
    }

    let riff_size = u32::try_from(bytes.len() - 8).unwrap_or(u32::MAX);
    if read_u32(bytes, 4) > riff_size {
        bytes[4..8].copy_from_slice(&riff_size.to_le_bytes());
    }

    let mut offset = 12usize;
    while offset + 8 <= bytes.len() {
        let size = read_u32(bytes, offset + 4) as usize;
        let available = bytes.len() - offset - 8;
        if &bytes[offset..offset + 4] == b"data" {
            if size > available {
                let clamped = u32::try_from(available).unwrap_or(u32::MAX);
                bytes[offset + 4..offset + 8].copy_from_slice(&clamped.to_le_bytes());
            }
            return;
        }
        // Chunks are padded to even length
        offset = offset.saturating_add(8 + size + (size & 1));
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Decode every sample of an open WAV stream into a channel-major waveform
pub fn decode<R: Read>(
    reader: WavReader<R>,
    name: &str,
    normalize: bool,
) -> Result<Waveform, IoError> {
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(IoError::UnsupportedWav {
            path: name.to_string(),
            reason: "no channels".to_string(),
        });
    }
    let wav_error = |source| IoError::Wav {
        path: name.to_string(),
        source,
    };

    let mut interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(IoError::UnsupportedWav {
                    path: name.to_string(),
                    reason: format!("{} bits per sample", spec.bits_per_sample),
                });
            }
            let scale = if normalize {
                1.0 / (1u64 << (spec.bits_per_sample - 1)) as f64
            } else {
                1.0
            };
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f64 * scale))
                .collect::<Result<_, _>>()
                .map_err(wav_error)?
        }
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(wav_error)?,
    };

    // Drop a trailing partial sample frame
    interleaved.truncate(interleaved.len() / channels * channels);
    let num_samples = interleaved.len() / channels;

    let data = Array2::from_shape_vec((num_samples, channels), interleaved)
        .map_err(|e| IoError::UnsupportedWav {
            path: name.to_string(),
            reason: e.to_string(),
        })?
        .reversed_axes()
        .as_standard_layout()
        .into_owned();

    log::trace!(
        "Read {}: {} channel(s), {} samples, {} Hz",
        name,
        channels,
        num_samples,
        spec.sample_rate
    );

    Ok(Waveform::new(data, spec.sample_rate as f64))
}
