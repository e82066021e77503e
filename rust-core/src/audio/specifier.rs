//! Read/write specifiers distinguishing archives from plain files
//!
//! - `scp:<listing>` reads keyed waveforms from an scp listing
//! - `ark:<path>` as input reads a wave archive (`ark:-` for stdin)
//! - `ark:<path>`, `ark,b:<path>` as output write a binary feature archive
//! - `ark,t:<path>` writes a text feature archive
//!
//! Anything without a recognized `type[,opts]:` prefix is a plain file name.
//! Read options that only tune table lookups (`o`, `s`, `cs`, `p`, `bg`) are
//! accepted and ignored, since tables are only ever read sequentially.

use super::table::{ArkWaveReader, ScpReader, WaveEntry};
use crate::error::IoError;
use std::path::PathBuf;

const READ_OPTIONS: [&str; 5] = ["o", "s", "cs", "p", "bg"];

/// Sequential stream of keyed waveforms
pub type WaveTable = Box<dyn Iterator<Item = Result<WaveEntry, IoError>>>;

/// Keyed waveform source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rspecifier {
    Scp(PathBuf),
    Ark(PathBuf),
}

impl Rspecifier {
    /// `Ok(None)` for a plain file name
    pub fn parse(spec: &str) -> Result<Option<Self>, IoError> {
        let Some((kind, options, path)) = split(spec) else {
            return Ok(None);
        };
        if path.is_empty() || !options.iter().all(|o| READ_OPTIONS.contains(o)) {
            return Err(IoError::InvalidSpecifier(spec.to_string()));
        }

        let path = PathBuf::from(path);
        Ok(Some(match kind {
            "scp" => Rspecifier::Scp(path),
            _ => Rspecifier::Ark(path),
        }))
    }

    /// Open the table for sequential reading
    pub fn open(&self) -> Result<WaveTable, IoError> {
        let table: WaveTable = match self {
            Rspecifier::Scp(path) => Box::new(ScpReader::open(path)?),
            Rspecifier::Ark(path) => Box::new(ArkWaveReader::open(path)?),
        };
        Ok(table)
    }
}

/// Keyed feature sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wspecifier {
    /// `path` of `-` writes to stdout
    Ark { path: String, binary: bool },
}

impl Wspecifier {
    /// `Ok(None)` for a plain file name
    pub fn parse(spec: &str) -> Result<Option<Self>, IoError> {
        let Some((kind, options, path)) = split(spec) else {
            return Ok(None);
        };
        if kind != "ark" || path.is_empty() {
            return Err(IoError::InvalidSpecifier(spec.to_string()));
        }

        let mut binary = true;
        for option in options {
            match option {
                "t" => binary = false,
                "b" => binary = true,
                _ => return Err(IoError::InvalidSpecifier(spec.to_string())),
            }
        }

        Ok(Some(Wspecifier::Ark {
            path: path.to_string(),
            binary,
        }))
    }
}

/// Split `type[,opt...]:path`; `None` when the prefix is not an archive type
fn split(spec: &str) -> Option<(&str, Vec<&str>, &str)> {
    let (prefix, path) = spec.split_once(':')?;
    let mut parts = prefix.split(',');
    let kind = parts.next()?;
    if kind != "ark" && kind != "scp" {
        return None;
    }
    Some((kind, parts.collect(), path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rspecifier() {
        assert_eq!(
            Rspecifier::parse("scp:data/wav.scp").unwrap(),
            Some(Rspecifier::Scp(PathBuf::from("data/wav.scp")))
        );
        assert_eq!(Rspecifier::parse("input.wav").unwrap(), None);
        assert_eq!(Rspecifier::parse("-").unwrap(), None);
        assert!(Rspecifier::parse("scp:").is_err());
        assert!(Rspecifier::parse("scp,t:wav.scp").is_err());
    }

    #[test]
    fn test_rspecifier_archive() {
        assert_eq!(
            Rspecifier::parse("ark:waves.ark").unwrap(),
            Some(Rspecifier::Ark(PathBuf::from("waves.ark")))
        );
        assert_eq!(
            Rspecifier::parse("ark,s,cs:-").unwrap(),
            Some(Rspecifier::Ark(PathBuf::from("-")))
        );
        assert_eq!(
            Rspecifier::parse("scp,p:wav.scp").unwrap(),
            Some(Rspecifier::Scp(PathBuf::from("wav.scp")))
        );
        assert!(Rspecifier::parse("ark:").is_err());
    }

    #[test]
    fn test_rspecifier_open() {
        let path = std::env::temp_dir().join(format!("stft-stats-spec-{}.scp", std::process::id()));
        std::fs::write(&path, "utt1 a.wav\nutt2 gen.sh |\n").unwrap();

        let table = Rspecifier::parse(&format!("scp:{}", path.display()))
            .unwrap()
            .unwrap()
            .open()
            .unwrap();
        let keys: Vec<String> = table.map(|entry| entry.unwrap().key).collect();
        assert_eq!(keys, vec!["utt1", "utt2"]);

        std::fs::remove_file(&path).unwrap();
        assert!(Rspecifier::Ark(path).open().is_err());
    }

    #[test]
    fn test_wspecifier() {
        assert_eq!(
            Wspecifier::parse("ark:feats.ark").unwrap(),
            Some(Wspecifier::Ark {
                path: "feats.ark".into(),
                binary: true
            })
        );
        assert_eq!(
            Wspecifier::parse("ark,t:-").unwrap(),
            Some(Wspecifier::Ark {
                path: "-".into(),
                binary: false
            })
        );
        assert_eq!(Wspecifier::parse("feats.mat").unwrap(), None);
        assert!(Wspecifier::parse("scp:feats.scp").is_err());
        assert!(Wspecifier::parse("ark,x:feats.ark").is_err());
    }
}
