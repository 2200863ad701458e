//! Core audio types and structures

/// Sample buffer type
pub mod audio;
/// Enhancement settings
pub mod settings;

pub use audio::SampleBuffer;
pub use settings::{Preset, ProcessingSettings};
