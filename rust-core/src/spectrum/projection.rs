//! Projection of complex spectra onto output rows
//!
//! | representation | row width      | value per bin                  |
//! |----------------|----------------|--------------------------------|
//! | `stft`         | 2 * bins       | re, im (exact)                 |
//! | `spectra`      | bins           | sqrt(re^2 + im^2), >= 0        |
//! | `angle`        | bins           | atan2(im, re) in (-pi, pi]     |

use super::options::{ComplexLayout, StftOptions};
use crate::error::RepresentationError;
use ndarray::ArrayViewMut1;
use num_complex::Complex;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// One output representation of the short-time transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Raw complex spectrum
    Stft,
    /// Magnitude spectrum
    Spectra,
    /// Phase angle
    Angle,
}

impl Representation {
    pub const ALL: [Representation; 3] = [
        Representation::Stft,
        Representation::Spectra,
        Representation::Angle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Representation::Stft => "stft",
            Representation::Spectra => "spectra",
            Representation::Angle => "angle",
        }
    }

    /// Columns per frame for a spectrum of `num_bins` bins
    pub fn width(&self, num_bins: usize) -> usize {
        match self {
            Representation::Stft => 2 * num_bins,
            Representation::Spectra | Representation::Angle => num_bins,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Representation {
    type Err = RepresentationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stft" => Ok(Representation::Stft),
            "spectra" => Ok(Representation::Spectra),
            "angle" => Ok(Representation::Angle),
            _ => Err(RepresentationError(s.to_string())),
        }
    }
}

/// Set of requested representations; any subset is valid, including none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Representations {
    pub stft: bool,
    pub spectra: bool,
    pub angle: bool,
}

impl Representations {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            stft: true,
            spectra: true,
            angle: true,
        }
    }

    pub fn with(mut self, representation: Representation) -> Self {
        match representation {
            Representation::Stft => self.stft = true,
            Representation::Spectra => self.spectra = true,
            Representation::Angle => self.angle = true,
        }
        self
    }

    pub fn contains(&self, representation: Representation) -> bool {
        match representation {
            Representation::Stft => self.stft,
            Representation::Spectra => self.spectra,
            Representation::Angle => self.angle,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.stft || self.spectra || self.angle)
    }

    pub fn iter(&self) -> impl Iterator<Item = Representation> + '_ {
        Representation::ALL
            .into_iter()
            .filter(move |r| self.contains(*r))
    }
}

impl From<Representation> for Representations {
    fn from(representation: Representation) -> Self {
        Self::none().with(representation)
    }
}

impl FromIterator<Representation> for Representations {
    fn from_iter<I: IntoIterator<Item = Representation>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

/// Writes one output row per representation from a frame's spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projector {
    layout: ComplexLayout,
    power: bool,
    log: bool,
}

impl Projector {
    pub fn new(options: &StftOptions) -> Self {
        Self {
            layout: options.complex_layout,
            power: options.power,
            log: options.log,
        }
    }

    /// Write the row for `representation`; `row` must be exactly
    /// `representation.width(spectrum.len())` long
    pub fn project(
        &self,
        representation: Representation,
        spectrum: &[Complex<f64>],
        row: ArrayViewMut1<'_, f64>,
    ) {
        match representation {
            Representation::Stft => self.project_stft(spectrum, row),
            Representation::Spectra => self.project_spectra(spectrum, row),
            Representation::Angle => project_angle(spectrum, row),
        }
    }

    fn project_stft(&self, spectrum: &[Complex<f64>], mut row: ArrayViewMut1<'_, f64>) {
        let bins = spectrum.len();
        for (k, c) in spectrum.iter().enumerate() {
            let (re, im) = match self.layout {
                ComplexLayout::Interleaved => (2 * k, 2 * k + 1),
                ComplexLayout::Split => (k, bins + k),
            };
            row[re] = c.re;
            row[im] = c.im;
        }
    }

    fn project_spectra(&self, spectrum: &[Complex<f64>], mut row: ArrayViewMut1<'_, f64>) {
        for (value, c) in row.iter_mut().zip(spectrum.iter()) {
            let mut v = if self.power { c.norm_sqr() } else { c.norm() };
            if self.log {
                v = v.max(f64::EPSILON).ln();
            }
            *value = v;
        }
    }
}

fn project_angle(spectrum: &[Complex<f64>], mut row: ArrayViewMut1<'_, f64>) {
    for (value, c) in row.iter_mut().zip(spectrum.iter()) {
        *value = phase(*c);
    }
}

/// Phase in (-pi, pi], 0 for an exactly zero bin
pub fn phase(c: Complex<f64>) -> f64 {
    if c.re == 0.0 && c.im == 0.0 {
        return 0.0;
    }

    // atan2 gives -pi for a negative real with im == -0.0
    let angle = c.im.atan2(c.re);
    if angle <= -PI {
        PI
    } else {
        angle
    }
}
