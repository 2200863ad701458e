//! Audio encoder implementations

/// Canonical 16-bit PCM WAV export
pub mod wav;

pub use wav::{encode_wav, WavEncoder};

use crate::core::SampleBuffer;
use crate::error::AudioResult;
use std::path::{Path, PathBuf};

/// Trait for audio encoders
pub trait Encoder {
    /// Write a buffer to the output
    fn encode(&mut self, buffer: &SampleBuffer) -> AudioResult<()>;

    /// Finalize encoding (flush any remaining data)
    fn finalize(&mut self) -> AudioResult<()> {
        Ok(())
    }
}

/// Default export path: `enhanced_<stem>.wav` beside the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    input.with_file_name(format!("enhanced_{}.wav", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/talk.final.mp3")),
            PathBuf::from("/tmp/enhanced_talk.final.wav")
        );
        assert_eq!(
            default_output_path(Path::new("memo")),
            PathBuf::from("enhanced_memo.wav")
        );
    }
}
