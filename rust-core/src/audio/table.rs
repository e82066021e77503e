//! Keyed waveform tables: scp listings and wave archives
//!
//! An scp line is `<key> <rxfilename>`, where the rxfilename is a WAV path,
//! `-` for stdin, or a shell command ending in `|` whose stdout is a WAV file.
//! A wave archive is a sequence of `<key> ` followed by a complete RIFF file.

use super::input::{decode_bytes, read_command, read_wav};
use crate::error::IoError;
use crate::waveform::Waveform;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Where one waveform's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaveSource {
    File(PathBuf),
    /// Shell command (without the trailing `|`)
    Command(String),
    /// RIFF blob read out of an archive
    Memory(Vec<u8>),
}

impl WaveSource {
    /// Interpret an rxfilename: `cmd |` is a pipe, anything else a path
    pub fn parse(rxfilename: &str) -> Self {
        let rxfilename = rxfilename.trim();
        match rxfilename.strip_suffix('|') {
            Some(command) => WaveSource::Command(command.trim_end().to_string()),
            None => WaveSource::File(PathBuf::from(rxfilename)),
        }
    }

    pub fn read(&self, normalize: bool) -> Result<Waveform, IoError> {
        match self {
            WaveSource::File(path) => read_wav(path, normalize),
            WaveSource::Command(command) => read_command(command, normalize),
            WaveSource::Memory(bytes) => decode_bytes(bytes, "archive entry", normalize),
        }
    }
}

impl fmt::Display for WaveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveSource::File(path) => write!(f, "{}", path.display()),
            WaveSource::Command(command) => write!(f, "{command} |"),
            WaveSource::Memory(bytes) => write!(f, "<{} byte archive entry>", bytes.len()),
        }
    }
}

/// One keyed waveform of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveEntry {
    pub key: String,
    pub source: WaveSource,
}

/// Open `path` for reading; `-` is stdin
fn open_input(path: &Path) -> Result<Box<dyn BufRead>, IoError> {
    if path == Path::new("-") {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = File::open(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Sequential reader over an scp listing
///
/// Blank lines are skipped. A line with a key but no rxfilename is an error.
pub struct ScpReader<R> {
    lines: std::io::Lines<R>,
    name: String,
    line_number: usize,
}

impl ScpReader<Box<dyn BufRead>> {
    pub fn open(path: &Path) -> Result<Self, IoError> {
        Ok(Self::new(open_input(path)?, path.display().to_string()))
    }
}

impl<R: BufRead> ScpReader<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            name: name.into(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for ScpReader<R> {
    type Item = Result<WaveEntry, IoError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(IoError::file(self.name.clone(), e))),
            };
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let entry = match trimmed.split_once(char::is_whitespace) {
                Some((key, value)) if !value.trim().trim_end_matches('|').trim().is_empty() => {
                    Ok(WaveEntry {
                        key: key.to_string(),
                        source: WaveSource::parse(value),
                    })
                }
                _ => Err(IoError::MalformedScp {
                    path: self.name.clone(),
                    line: self.line_number,
                    content: line.clone(),
                }),
            };
            return Some(entry);
        }
    }
}

/// Sequential reader over a wave archive
///
/// Reading stops at the first malformed entry; the stream position is lost.
pub struct ArkWaveReader<R> {
    reader: R,
    name: String,
    done: bool,
}

impl ArkWaveReader<Box<dyn BufRead>> {
    pub fn open(path: &Path) -> Result<Self, IoError> {
        Ok(Self::new(open_input(path)?, path.display().to_string()))
    }
}

impl<R: BufRead> ArkWaveReader<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            done: false,
        }
    }

    fn io_error(&self, e: std::io::Error) -> IoError {
        IoError::file(self.name.clone(), e)
    }

    fn malformed(&self, reason: impl Into<String>) -> IoError {
        IoError::MalformedArk {
            path: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Skip whitespace between entries; false at end of input
    fn skip_whitespace(&mut self) -> Result<bool, IoError> {
        loop {
            let (skipped, available) = match self.reader.fill_buf() {
                Ok(buf) => (
                    buf.iter().take_while(|b| b.is_ascii_whitespace()).count(),
                    buf.len(),
                ),
                Err(e) => return Err(self.io_error(e)),
            };
            if available == 0 {
                return Ok(false);
            }
            self.reader.consume(skipped);
            if skipped < available {
                return Ok(true);
            }
        }
    }

    fn read_entry(&mut self) -> Result<Option<WaveEntry>, IoError> {
        if !self.skip_whitespace()? {
            return Ok(None);
        }

        let mut key = Vec::new();
        if let Err(e) = self.reader.read_until(b' ', &mut key) {
            return Err(self.io_error(e));
        }
        if key.pop() != Some(b' ') {
            return Err(self.malformed("input ends inside a key"));
        }
        let key = match String::from_utf8(key) {
            Ok(key) if !key.contains(|c: char| c.is_ascii_whitespace()) => key,
            _ => return Err(self.malformed("invalid key")),
        };

        let mut header = [0u8; 8];
        if let Err(e) = self.reader.read_exact(&mut header) {
            return Err(self.io_error(e));
        }
        if &header[..4] != b"RIFF" {
            return Err(self.malformed(format!("entry {key} is not a RIFF wave")));
        }

        let size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as u64;
        let mut blob = header.to_vec();
        if let Err(e) = (&mut self.reader).take(size).read_to_end(&mut blob) {
            return Err(self.io_error(e));
        }
        if blob.len() as u64 != 8 + size {
            return Err(self.malformed(format!("entry {key} is truncated")));
        }

        Ok(Some(WaveEntry {
            key,
            source: WaveSource::Memory(blob),
        }))
    }
}

impl<R: BufRead> Iterator for ArkWaveReader<R> {
    type Item = Result<WaveEntry, IoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
