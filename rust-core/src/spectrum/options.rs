//! Short-time transform configuration
//!
//! One immutable [`StftOptions`] value is handed to the engine at construction.
//! Options can be built in code, parsed from strings on the command line, or
//! loaded from a TOML file whose keys are the field names below.

use super::windows::WindowType;
use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Declares `FromStr`/`Display` for a fieldless option enum from its
/// kebab-case names.
macro_rules! option_names {
    ($ty:ident, $option:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn name(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(ConfigError::UnknownValue {
                        option: $option,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// How frames near the signal boundaries are formed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgePolicy {
    /// Only frames lying entirely inside the signal
    #[default]
    Snip,
    /// ceil(L / shift) frames; samples outside the signal are synthesized
    Pad,
}

option_names!(EdgePolicy, "edge-policy", { Snip => "snip", Pad => "pad" });

/// Where padded frames are anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PadAlignment {
    /// Frame i starts at i * shift
    #[default]
    Left,
    /// Frame i is centered on sample i * shift
    Center,
}

option_names!(PadAlignment, "pad-alignment", { Left => "left", Center => "center" });

/// What out-of-range samples are filled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PadMode {
    #[default]
    Zero,
    /// Mirror about the edge sample without repeating it: x[-1] = x[1]
    Reflect,
}

option_names!(PadMode, "pad-mode", { Zero => "zero", Reflect => "reflect" });

/// Column layout of raw complex (`stft`) rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplexLayout {
    /// re0, im0, re1, im1, ...
    #[default]
    Interleaved,
    /// re0, re1, ..., im0, im1, ...
    Split,
}

option_names!(ComplexLayout, "complex-layout", { Interleaved => "interleaved", Split => "split" });

/// FFT implementation used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformBackend {
    /// Real-input FFT (realfft), computes only the non-redundant half
    #[default]
    Realfft,
    /// Full complex FFT (rustfft), truncated to the non-redundant half
    Rustfft,
}

option_names!(TransformBackend, "backend", { Realfft => "realfft", Rustfft => "rustfft" });

/// Transform length policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "TransformLengthRepr")]
pub enum TransformLength {
    /// Smallest power of two >= frame length
    #[default]
    NextPowerOfTwo,
    /// Exactly the frame length
    FrameLength,
    /// Explicit length; must be >= frame length
    Fixed(usize),
}

impl TransformLength {
    /// Resolve to a sample count for the given frame length
    pub fn resolve(&self, frame_length: usize) -> usize {
        match *self {
            TransformLength::NextPowerOfTwo => frame_length.next_power_of_two(),
            TransformLength::FrameLength => frame_length,
            TransformLength::Fixed(n) => n,
        }
    }
}

impl fmt::Display for TransformLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformLength::NextPowerOfTwo => f.write_str("next-power-of-two"),
            TransformLength::FrameLength => f.write_str("frame-length"),
            TransformLength::Fixed(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for TransformLength {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next-power-of-two" => Ok(TransformLength::NextPowerOfTwo),
            "frame-length" => Ok(TransformLength::FrameLength),
            other => other
                .parse::<usize>()
                .map(TransformLength::Fixed)
                .map_err(|_| ConfigError::UnknownValue {
                    option: "transform-length",
                    value: s.to_string(),
                }),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TransformLengthRepr {
    Fixed(usize),
    Named(String),
}

impl TryFrom<TransformLengthRepr> for TransformLength {
    type Error = ConfigError;

    fn try_from(repr: TransformLengthRepr) -> Result<Self, Self::Error> {
        match repr {
            TransformLengthRepr::Fixed(n) => Ok(TransformLength::Fixed(n)),
            TransformLengthRepr::Named(name) => name.parse(),
        }
    }
}

/// Short-time transform configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StftOptions {
    /// Frame length in samples (F)
    pub frame_length: usize,

    /// Distance between frame starts in samples (S)
    pub frame_shift: usize,

    /// Analysis window
    pub window: WindowType,

    /// FFT length policy (N)
    pub transform_length: TransformLength,

    /// Boundary handling
    pub edge_policy: EdgePolicy,

    /// Frame anchoring under `EdgePolicy::Pad`
    pub pad_alignment: PadAlignment,

    /// Fill for out-of-range samples under `EdgePolicy::Pad`
    pub pad_mode: PadMode,

    /// Sample rate in Hz, only used for the frequency axis
    pub sample_rate: f64,

    /// Layout of raw complex rows
    pub complex_layout: ComplexLayout,

    /// Square the magnitude spectrum (power spectrum)
    pub power: bool,

    /// Natural log of the (power) magnitude spectrum, floored at machine epsilon
    pub log: bool,

    /// FFT implementation
    pub backend: TransformBackend,
}

impl Default for StftOptions {
    fn default() -> Self {
        Self {
            frame_length: 400,
            frame_shift: 160,
            window: WindowType::Hamming,
            transform_length: TransformLength::NextPowerOfTwo,
            edge_policy: EdgePolicy::Snip,
            pad_alignment: PadAlignment::Left,
            pad_mode: PadMode::Zero,
            sample_rate: 16000.0,
            complex_layout: ComplexLayout::Interleaved,
            power: false,
            log: false,
            backend: TransformBackend::Realfft,
        }
    }
}

impl StftOptions {
    /// Transform length N
    pub fn fft_length(&self) -> usize {
        self.transform_length.resolve(self.frame_length)
    }

    /// Number of non-redundant bins, N/2 + 1
    pub fn num_bins(&self) -> usize {
        self.fft_length() / 2 + 1
    }

    /// Check the frame/shift/transform relationships
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_length == 0 {
            return Err(ConfigError::ZeroFrameLength);
        }
        if self.frame_shift == 0 {
            return Err(ConfigError::ZeroFrameShift);
        }

        let fft_length = self.fft_length();
        if fft_length == 0 {
            return Err(ConfigError::ZeroTransformLength);
        }
        if self.frame_length > fft_length {
            return Err(ConfigError::FrameExceedsTransform {
                frame_length: self.frame_length,
                fft_length,
            });
        }

        Ok(())
    }

    /// Parse options from TOML text; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
