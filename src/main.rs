//! voice-polish command line interface
//!
//! Decodes an audio file, runs the enhancement pipeline and writes the
//! result as 16-bit PCM WAV.

use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use voice_polish::encoder::{default_output_path, Encoder, WavEncoder};
use voice_polish::{
    decoder, EnhancementPipeline, PipelineState, Preset, ProcessingSettings, Progress,
};

#[derive(Parser)]
#[command(name = "voice-polish")]
#[command(
    about = "Clean up recorded speech: gate noise, clarify voice, cut pauses, level volume",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enhance an audio file and export it as WAV
    Enhance {
        /// Input audio file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output WAV file (default: enhanced_<name>.wav next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Print basic information about an audio file
    Probe {
        /// Input audio file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Args)]
struct SettingsArgs {
    /// Start from a named preset; the flags below override it
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Noise reduction intensity, 0 disables the gate [default: 0.2]
    #[arg(long = "noise")]
    noise_reduction: Option<f32>,

    /// Voice enhancement intensity, 0 disables it [default: 0.3]
    #[arg(long = "voice")]
    voice_enhancement: Option<f32>,

    /// Keep long pauses
    #[arg(long)]
    no_silence_removal: bool,

    /// RMS level below which audio counts as silence [default: 0.005]
    #[arg(long)]
    silence_threshold: Option<f32>,

    /// Skip volume normalization
    #[arg(long)]
    no_normalize: bool,

    /// Target peak level after normalization [default: 0.8]
    #[arg(long)]
    target_volume: Option<f32>,
}

impl From<SettingsArgs> for ProcessingSettings {
    fn from(args: SettingsArgs) -> Self {
        let base = args
            .preset
            .map(ProcessingSettings::preset)
            .unwrap_or_default();

        ProcessingSettings {
            noise_reduction: args.noise_reduction.unwrap_or(base.noise_reduction),
            voice_enhancement: args.voice_enhancement.unwrap_or(base.voice_enhancement),
            silence_removal: base.silence_removal && !args.no_silence_removal,
            silence_threshold: args.silence_threshold.unwrap_or(base.silence_threshold),
            volume_normalization: base.volume_normalization && !args.no_normalize,
            target_volume: args.target_volume.unwrap_or(base.target_volume),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    info!("voice-polish {}", voice_polish::VERSION);

    match cli.command {
        Commands::Enhance {
            input,
            output,
            settings,
        } => {
            let settings = ProcessingSettings::from(settings);
            let mut pipeline = EnhancementPipeline::new(&settings)?;

            let buffer = decoder::decode_file(&input)?;
            let before = buffer.duration();

            let mut on_progress = |p: Progress| println!("{}", p);
            let result = pipeline.run(buffer, Some(&mut on_progress));

            let output = output.unwrap_or_else(|| default_output_path(&input));
            let mut encoder = WavEncoder::new(
                &output,
                result.buffer.sample_rate(),
                result.buffer.channel_count(),
            )?;
            encoder.encode(&result.buffer)?;
            encoder.finalize()?;

            println!(
                "{:?} -> {:?} ({:.2}s -> {:.2}s)",
                input,
                output,
                before.as_secs_f64(),
                result.buffer.duration().as_secs_f64()
            );

            if result.state == PipelineState::Failed {
                if let Some(err) = result.error {
                    eprintln!("warning: {}", err);
                }
            }
        }
        Commands::Probe { input } => {
            let buffer = decoder::decode_file(&input)?;
            println!("File:        {:?}", input);
            println!("Sample rate: {} Hz", buffer.sample_rate());
            println!("Channels:    {}", buffer.channel_count());
            println!("Frames:      {}", buffer.frame_count());
            println!("Duration:    {:.2}s", buffer.duration().as_secs_f64());
            println!("Peak:        {:.4}", buffer.peak());
        }
    }

    Ok(())
}
