use std::convert::Infallible;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use futures::stream;
use tracing::info;

use doubao_stream::{
    StreamConfig,
    core::tts::doubao::{decode_stream, describe_wav},
};

/// Doubao TTS stream decoder - replays captured responses into audio
#[derive(Parser, Debug)]
#[command(name = "doubao-stream")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a captured newline-delimited JSON response body
    Decode {
        /// File holding the raw response body
        #[arg(short = 'i', long = "input", value_name = "FILE")]
        input: PathBuf,

        /// Write the decoded audio to this file
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,

        /// Feed the body in chunks of this many bytes (whole file if not specified)
        #[arg(long = "chunk-size", value_name = "BYTES")]
        chunk_size: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration from file or environment
    let config = if let Some(config_path) = cli.config {
        info!("Loading configuration from {}", config_path.display());
        StreamConfig::from_file(&config_path).map_err(|e| anyhow!(e.to_string()))?
    } else {
        StreamConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
    };

    match cli.command {
        Commands::Decode {
            input,
            output,
            chunk_size,
        } => decode(&config, &input, output.as_ref(), chunk_size).await,
    }
}

async fn decode(
    config: &StreamConfig,
    input: &PathBuf,
    output: Option<&PathBuf>,
    chunk_size: Option<usize>,
) -> anyhow::Result<()> {
    let body = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let chunk_size = match chunk_size {
        Some(0) => anyhow::bail!("--chunk-size must be greater than zero"),
        Some(size) => size,
        None => body.len().max(1),
    };

    info!(
        "Replaying {} bytes from {} in chunks of {} bytes",
        body.len(),
        input.display(),
        chunk_size
    );

    let chunks = stream::iter(body.chunks(chunk_size).map(Ok::<_, Infallible>));
    let audio = decode_stream(chunks, &config.decoder)
        .await
        .context("Failed to decode response body")?;

    println!("Decoded {} bytes of audio", audio.len());
    match describe_wav(&audio) {
        Some(wav) => println!(
            "WAV: {} channel(s), {} Hz, {}-bit, {} frames ({:.2}s)",
            wav.channels, wav.sample_rate, wav.bits_per_sample, wav.frames, wav.duration_secs
        ),
        None => println!("Format: not WAV, passed through unmodified"),
    }

    if let Some(output_path) = output {
        fs::write(output_path, &audio)
            .with_context(|| format!("Failed to write to {}", output_path.display()))?;
        println!("Audio written to {}", output_path.display());
    }

    Ok(())
}
