//! Window functions for short-time spectral analysis
//!
//! All windows are symmetric over the frame, w[n] for n = 0..M-1 with
//! denominator M-1, so w[0] == w[M-1].

use crate::error::ConfigError;
use serde::Deserialize;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// Rectangular window (no windowing)
    Rectangular,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    /// Mainlobe width: 8π/M, Sidelobe attenuation: ~53 dB
    #[default]
    Hamming,

    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    /// Mainlobe width: 8π/M, Sidelobe attenuation: ~44 dB
    #[serde(alias = "hann")]
    Hanning,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    /// Mainlobe width: 12π/M, Sidelobe attenuation: ~74 dB
    Blackman,

    /// Hann window raised to the power 0.85, the speech-recognition default
    /// that keeps the endpoints at zero without a sharp edge
    Povey,
}

impl WindowType {
    pub const ALL: [WindowType; 5] = [
        WindowType::Rectangular,
        WindowType::Hamming,
        WindowType::Hanning,
        WindowType::Blackman,
        WindowType::Povey,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Rectangular => "rectangular",
            WindowType::Hamming => "hamming",
            WindowType::Hanning => "hanning",
            WindowType::Blackman => "blackman",
            WindowType::Povey => "povey",
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rectangular" => Ok(WindowType::Rectangular),
            "hamming" => Ok(WindowType::Hamming),
            "hanning" | "hann" => Ok(WindowType::Hanning),
            "blackman" => Ok(WindowType::Blackman),
            "povey" => Ok(WindowType::Povey),
            _ => Err(ConfigError::UnknownWindow(s.to_string())),
        }
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    // A single tap has no shape; M-1 would be zero
    if length == 1 {
        return vec![1.0];
    }

    let denom = (length - 1) as f64;
    let hann = |n: usize| 0.5 - 0.5 * (2.0 * PI * n as f64 / denom).cos();

    match window_type {
        WindowType::Rectangular => vec![1.0; length],
        WindowType::Hamming => (0..length)
            .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / denom).cos())
            .collect(),
        WindowType::Hanning => (0..length).map(hann).collect(),
        WindowType::Blackman => (0..length)
            .map(|n| {
                let angle1 = 2.0 * PI * n as f64 / denom;
                let angle2 = 4.0 * PI * n as f64 / denom;
                0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos()
            })
            .collect(),
        // hann(n) can come out a hair below zero at the endpoints
        WindowType::Povey => (0..length).map(|n| hann(n).max(0.0).powf(0.85)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_generation() {
        let length = 161;

        for window_type in WindowType::ALL {
            let window = generate_window(window_type, length);
            assert_eq!(window.len(), length);

            // Symmetric
            for n in 0..length {
                assert!((window[n] - window[length - 1 - n]).abs() < 1e-12);
            }

            // Peak of 1.0 at the center for odd lengths
            assert!((window[length / 2] - 1.0).abs() < 1e-10, "{window_type}");
        }

        let hamming = generate_window(WindowType::Hamming, length);
        assert!(hamming[0] > 0.07 && hamming[0] < 0.09);

        let povey = generate_window(WindowType::Povey, length);
        assert_eq!(povey[0], 0.0);
    }

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(WindowType::Rectangular, 100);
        assert_eq!(window.len(), 100);
        assert!(window.iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_single_tap() {
        for window_type in WindowType::ALL {
            assert_eq!(generate_window(window_type, 1), vec![1.0]);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("hamming".parse::<WindowType>(), Ok(WindowType::Hamming));
        assert_eq!("hann".parse::<WindowType>(), Ok(WindowType::Hanning));
        assert_eq!("hanning".parse::<WindowType>(), Ok(WindowType::Hanning));
        assert_eq!(
            "kaiser".parse::<WindowType>(),
            Err(ConfigError::UnknownWindow("kaiser".into()))
        );

        for window_type in WindowType::ALL {
            assert_eq!(window_type.name().parse::<WindowType>(), Ok(window_type));
        }
    }

    #[derive(Debug, serde::Deserialize)]
    struct Holder {
        window: WindowType,
    }

    #[test]
    fn test_names_are_case_sensitive() {
        // Command-line parsing and config deserialization accept the same names
        for name in ["Hann", "HAMMING", "Povey"] {
            assert!(name.parse::<WindowType>().is_err());
            assert!(toml::from_str::<Holder>(&format!("window = {name:?}")).is_err());
        }
        for name in ["hann", "hamming", "povey"] {
            let parsed = name.parse::<WindowType>().unwrap();
            let holder: Holder = toml::from_str(&format!("window = {name:?}")).unwrap();
            assert_eq!(holder.window, parsed);
        }
    }
}
