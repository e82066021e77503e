mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::process::ExitCode;
use stft_stats::audio::{ArkWriter, FeatureExtractor, Rspecifier, Wspecifier};
use stft_stats::StftComputer;

use cli::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp_millis()
        .init();

    let options = cli.stft_options()?;
    let computer = StftComputer::new(options).context("Invalid STFT options")?;
    let extractor = FeatureExtractor::new(computer, cli.output, cli.normalize_input);

    let rspecifier = Rspecifier::parse(&cli.wav_in)?;
    let wspecifier = Wspecifier::parse(&cli.feats_out)?;

    match (rspecifier, wspecifier) {
        (Some(rspecifier), Some(Wspecifier::Ark { path, binary })) => {
            if let Some(jobs) = cli.jobs {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build_global()
                    .context("Failed to start worker threads")?;
            }

            let table = rspecifier
                .open()
                .with_context(|| format!("Could not open rspecifier {}", cli.wav_in))?;
            let mut writer = ArkWriter::create(&path, binary).with_context(|| {
                format!("Could not initialize output with wspecifier {}", cli.feats_out)
            })?;

            let summary = extractor.process_archive(table, &mut writer)?;
            writer.finish()?;

            if !summary.is_success() {
                log::error!("No features were written to {}", cli.feats_out);
                return Ok(ExitCode::FAILURE);
            }
        }
        (None, None) => {
            extractor
                .process_file(&cli.wav_in, &cli.feats_out, cli.binary)
                .with_context(|| format!("Failed to process {}", cli.wav_in))?;
        }
        _ => bail!("Cannot mix archives with regular files"),
    }

    Ok(ExitCode::SUCCESS)
}
