use std::io;
use thiserror::Error;

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;

/// Error types for decoding, enhancing and exporting audio
#[derive(Error, Debug)]
pub enum AudioError {
    /// IO error (file operations, disk access)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported audio format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Invalid audio metadata
    #[error("Invalid audio metadata: {0}")]
    InvalidMetadata(String),

    /// Decoding failed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Encoding failed
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// Buffer rejected at construction (no channels, no frames, ragged channels)
    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),

    /// Invalid sample rate
    #[error("Invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate
        rate: u32,
    },

    /// Settings outside their allowed range
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A processing stage could not produce a usable buffer
    #[error("{stage} stage failed: {reason}")]
    StageFailure {
        /// Name of the stage that failed
        stage: &'static str,
        /// What went wrong
        reason: String,
    },

    /// Input file exceeds the accepted size
    #[error("Input is {size} bytes, limit is {limit} bytes")]
    InputTooLarge {
        /// Size of the rejected input
        size: u64,
        /// Accepted maximum
        limit: u64,
    },
}

impl AudioError {
    /// Build a stage failure
    pub fn stage(stage: &'static str, reason: impl Into<String>) -> Self {
        AudioError::StageFailure {
            stage,
            reason: reason.into(),
        }
    }
}

impl From<symphonia::core::errors::Error> for AudioError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        match err {
            symphonia::core::errors::Error::IoError(e) => AudioError::Io(e),
            symphonia::core::errors::Error::Unsupported(what) => {
                AudioError::UnsupportedFormat(what.to_string())
            }
            e => AudioError::DecodeError(e.to_string()),
        }
    }
}
