//! Enhancement stages
//!
//! Each stage reads a [`SampleBuffer`] and builds a new one; none of them
//! touch their input.

/// Soft noise gate
pub mod noise_gate;
/// High-pass, emphasis and compression
pub mod voice;
/// Pause removal
pub mod silence;
/// Peak normalization
pub mod normalize;

pub use noise_gate::NoiseGate;
pub use voice::{HighPass, VoiceEnhance};
pub use silence::{SilenceRegion, SilenceTrim};
pub use normalize::Normalize;

use crate::core::SampleBuffer;
use crate::error::AudioResult;

/// Trait for enhancement stages
pub trait Filter {
    /// Process a buffer through this stage, producing a new buffer
    fn process(&mut self, buffer: &SampleBuffer) -> AudioResult<SampleBuffer>;

    /// Short stage name used in logs and errors
    fn name(&self) -> &'static str;
}
