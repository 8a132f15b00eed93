//! wavembed - tone generator and WAV-to-C-array encoder
//!
//! Generates beep tones for the I2S speaker and turns WAV files into
//! headers that can be compiled straight into firmware.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wavembed_audio::{Job, Pitch, Quantization, ToneConfig, WavInfo, write_tone};
use wavembed_core::{DEFAULT_BYTES_PER_LINE, SampleRate, sample_rates};
use wavembed_header::naming::{header_path_for, tone_paths};
use wavembed_header::{ArrayNames, encode_file, frequency_tag};

/// Generate firmware audio assets
#[derive(Parser, Debug)]
#[command(name = "wavembed")]
#[command(about = "Generate tones and embed WAV files as C byte arrays", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize a stereo beep and emit its WAV file and C header
    Tone(ToneArgs),

    /// Emit a C header for an existing file
    Encode(EncodeArgs),

    /// Print the format of a WAV file
    Inspect {
        /// WAV file to inspect
        input: PathBuf,
    },

    /// Render every tone listed in a RON job file
    Batch {
        /// Job file
        job: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ToneArgs {
    /// Frequency (Hz)
    #[arg(short, long, default_value_t = 494.0, conflicts_with = "note")]
    frequency: f64,

    /// Note name instead of a frequency (e.g. B4, C#4, Db5)
    #[arg(short, long)]
    note: Option<Pitch>,

    /// Sample rate (Hz)
    #[arg(short, long, default_value_t = sample_rates::SR_48000)]
    sample_rate: SampleRate,

    /// Duration (seconds)
    #[arg(short, long, default_value_t = 0.5)]
    duration: f64,

    /// Amplitude (0.0-1.0]
    #[arg(short, long, default_value_t = 0.1)]
    amplitude: f64,

    /// Round samples to nearest instead of truncating toward zero
    #[arg(long)]
    round: bool,

    /// Directory for the generated files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Hex entries per line in the header
    #[arg(long, default_value_t = DEFAULT_BYTES_PER_LINE)]
    bytes_per_line: usize,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Input file (usually a WAV)
    #[arg(short, long, default_value = "cast_away_fire.wav")]
    input: PathBuf,

    /// Output header (default: input with a .h extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Array name (default: derived from the input file name)
    #[arg(long)]
    name: Option<String>,

    /// Hex entries per line in the header
    #[arg(long, default_value_t = DEFAULT_BYTES_PER_LINE)]
    bytes_per_line: usize,
}

impl ToneArgs {
    fn config(&self) -> Result<ToneConfig> {
        let frequency = match self.note {
            Some(pitch) => pitch
                .frequency()
                .with_context(|| format!("No frequency for note {pitch}"))?,
            None => self.frequency,
        };

        let config = ToneConfig {
            sample_rate: self.sample_rate,
            duration_secs: self.duration,
            frequency,
            amplitude: self.amplitude,
            quantization: if self.round {
                Quantization::Round
            } else {
                Quantization::Truncate
            },
        };
        config.validate().context("Invalid tone parameters")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wavembed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Tone(args) => {
            let config = args.config()?;
            render_tone(&config, &args.out_dir, args.bytes_per_line)
        }
        Command::Encode(args) => encode(&args),
        Command::Inspect { input } => inspect(&input),
        Command::Batch { job } => run_batch(&job),
    }
}

/// Write the WAV for `config`, then embed the written file in a header
fn render_tone(config: &ToneConfig, out_dir: &Path, bytes_per_line: usize) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let tag = frequency_tag(config.frequency);
    let (wav_path, header_path) = tone_paths(out_dir, &tag);

    tracing::info!(
        "Generating {:.2} Hz tone: {} Hz, {:.3} s, amplitude {:.2}, {:?}",
        config.frequency,
        config.sample_rate,
        config.duration_secs,
        config.amplitude,
        config.quantization
    );

    let report = write_tone(config, &wav_path)
        .with_context(|| format!("Failed to write WAV file: {}", wav_path.display()))?;

    let names = ArrayNames::for_tone(&tag);
    encode_file(&wav_path, &header_path, &names, bytes_per_line)
        .with_context(|| format!("Failed to write header: {}", header_path.display()))?;

    println!("WAV file saved to: {} ({} frames)", wav_path.display(), report.frames);
    println!("Array header saved to: {}", header_path.display());
    Ok(())
}

fn encode(args: &EncodeArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| header_path_for(&args.input));

    let names = match &args.name {
        Some(name) => ArrayNames::new(name.clone(), format!("{name}_len")),
        None => ArrayNames::from_path(&args.input),
    }
    .context("Invalid array name")?;

    let count = encode_file(&args.input, &output, &names, args.bytes_per_line)
        .with_context(|| format!("Failed to encode {}", args.input.display()))?;

    println!(
        "Full file array ({count} bytes) saved to: {}",
        output.display()
    );
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let bytes = wavembed_core::fs::read(input)?;
    let info = WavInfo::parse(&bytes)
        .with_context(|| format!("Not a usable PCM WAV file: {}", input.display()))?;

    println!("{}", input.display());
    println!("  File size:   {} bytes", bytes.len());
    println!("  Format:      PCM ({})", info.audio_format);
    println!("  Channels:    {}", info.channels);
    println!("  Sample rate: {} Hz", info.sample_rate);
    println!("  Bits:        {}", info.bits_per_sample);
    println!("  Data:        {} bytes at offset {}", info.data_len, info.data_offset);
    println!(
        "  Frames:      {} ({:.3} seconds)",
        info.frame_count(),
        info.duration_secs()
    );
    Ok(())
}

fn run_batch(job_path: &Path) -> Result<()> {
    let job = Job::load(job_path)
        .with_context(|| format!("Failed to load job: {}", job_path.display()))?;
    let configs = job.tone_configs().context("Invalid job")?;

    // Relative output directories are resolved against the job file
    let out_dir = match job_path.parent() {
        Some(parent) if job.output_dir.is_relative() => parent.join(&job.output_dir),
        _ => job.output_dir.clone(),
    };

    tracing::info!(
        "Rendering {} tones into {}",
        configs.len(),
        out_dir.display()
    );

    for config in &configs {
        render_tone(config, &out_dir, job.bytes_per_line)?;
    }

    println!("Rendered {} tones", configs.len());
    Ok(())
}
