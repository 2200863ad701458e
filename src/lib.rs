#![warn(missing_docs)]

//! # voice-polish: speech enhancement for recorded audio
//!
//! Runs a decoded PCM buffer through a fixed chain of stages and exports the
//! result as 16-bit PCM WAV.
//!
//! ## Stages
//!
//! - **Noise gate** - percentile noise floor, soft per-sample attenuation
//! - **Voice** - 80 Hz high-pass, first-difference emphasis, soft compressor
//! - **Silence trim** - cuts pauses longer than a second, keeping 400 ms edges
//! - **Normalize** - peak normalization with headroom and a no-op deadband
//!
//! A stage failure never loses audio: the pipeline hands back the original
//! buffer and reports [`Progress::Failed`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use voice_polish::{enhance, ProcessingSettings, Progress, SampleBuffer};
//! use voice_polish::encoder::encode_wav;
//!
//! # fn main() -> voice_polish::AudioResult<()> {
//! let buffer = SampleBuffer::new(vec![vec![0.0, 0.1, -0.1, 0.5]], 44100)?;
//! let mut on_progress = |p: Progress| println!("{}", p);
//! let enhanced = enhance(buffer, &ProcessingSettings::default(), Some(&mut on_progress))?;
//! let wav = encode_wav(&enhanced)?;
//! # Ok(())
//! # }
//! ```

/// Core audio types and structures
pub mod core;
/// Error types for audio operations
pub mod error;
/// Audio decoder implementations
pub mod decoder;
/// Enhancement stages
pub mod filter;
/// Audio encoder implementations
pub mod encoder;
/// Enhancement pipeline
pub mod processor;

// Export public types
pub use crate::core::{Preset, ProcessingSettings, SampleBuffer};
pub use error::{AudioError, AudioResult};
pub use processor::{
    enhance, Enhancement, EnhancementPipeline, PipelineState, Progress, ProgressListener,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
