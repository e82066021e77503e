use clap::{ArgAction, Parser};
use std::path::PathBuf;
use stft_stats::spectrum::{
    ComplexLayout, EdgePolicy, PadAlignment, PadMode, StftOptions, TransformBackend,
    TransformLength,
};
use stft_stats::{ConfigError, Representation, WindowType};

#[derive(Parser, Debug)]
#[command(
    name = "compute-stft-stats",
    about = "Compute short-time Fourier transform statistics (stft, spectra, angle) of waveforms",
    after_help = concat!(
        "Usage:  compute-stft-stats [options...] <wav-rspecifier> <feats-wspecifier>\n",
        "   or:  compute-stft-stats [options...] <wav-rxfilename> <feats-wxfilename>\n\n",
        "Tables: scp:<wav.scp> or ark:<waves.ark> in, ark[,t]:<path> out (- for stdin/stdout).\n",
        "An rxfilename ending in '|' is run as a shell command producing a WAV file."
    )
)]
pub struct Cli {
    /// Input WAV (path, - or `cmd |`), scp:<listing> or ark:<wave archive>
    pub wav_in: String,

    /// Output matrix file (- for stdout) or ark[,t|,b]:<path> archive
    pub feats_out: String,

    /// Representation to write: stft, spectra or angle
    #[arg(long, default_value = "spectra")]
    pub output: Representation,

    /// Write a binary matrix (single-file output only)
    #[arg(
        long,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub binary: bool,

    /// TOML file with STFT options; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frame length in samples
    #[arg(long)]
    pub frame_length: Option<usize>,

    /// Frame shift in samples
    #[arg(long)]
    pub frame_shift: Option<usize>,

    /// Window: rectangular, hamming, hanning, blackman, povey
    #[arg(long)]
    pub window: Option<WindowType>,

    /// FFT length: next-power-of-two, frame-length or a sample count
    #[arg(long)]
    pub transform_length: Option<TransformLength>,

    /// Edge handling: snip or pad
    #[arg(long)]
    pub edge_policy: Option<EdgePolicy>,

    /// Padded frame anchoring: left or center
    #[arg(long)]
    pub pad_alignment: Option<PadAlignment>,

    /// Padding fill: zero or reflect
    #[arg(long)]
    pub pad_mode: Option<PadMode>,

    /// Sample rate in Hz (frequency axis only)
    #[arg(long)]
    pub sample_rate: Option<f64>,

    /// stft column layout: interleaved or split
    #[arg(long)]
    pub complex_layout: Option<ComplexLayout>,

    /// Output power instead of magnitude spectra
    #[arg(long)]
    pub power: Option<bool>,

    /// Take the natural log of the spectra
    #[arg(long)]
    pub log: Option<bool>,

    /// FFT implementation: realfft or rustfft
    #[arg(long)]
    pub backend: Option<TransformBackend>,

    /// Scale integer PCM into [-1, 1)
    #[arg(long)]
    pub normalize_input: bool,

    /// Worker threads for archive processing (default: one per core)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Defaults, then the config file, then command-line flags
    pub fn stft_options(&self) -> Result<StftOptions, ConfigError> {
        let mut options = match &self.config {
            Some(path) => {
                let options = StftOptions::load(path)?;
                log::info!("Loaded config from {}", path.display());
                options
            }
            None => StftOptions::default(),
        };

        if let Some(v) = self.frame_length {
            options.frame_length = v;
        }
        if let Some(v) = self.frame_shift {
            options.frame_shift = v;
        }
        if let Some(v) = self.window {
            options.window = v;
        }
        if let Some(v) = self.transform_length {
            options.transform_length = v;
        }
        if let Some(v) = self.edge_policy {
            options.edge_policy = v;
        }
        if let Some(v) = self.pad_alignment {
            options.pad_alignment = v;
        }
        if let Some(v) = self.pad_mode {
            options.pad_mode = v;
        }
        if let Some(v) = self.sample_rate {
            options.sample_rate = v;
        }
        if let Some(v) = self.complex_layout {
            options.complex_layout = v;
        }
        if let Some(v) = self.power {
            options.power = v;
        }
        if let Some(v) = self.log {
            options.log = v;
        }
        if let Some(v) = self.backend {
            options.backend = v;
        }

        Ok(options)
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
