//! Audio decoder implementations

/// Decoding through symphonia
pub mod symphonia;

pub use self::symphonia::SymphoniaDecoder;

use crate::core::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use std::path::Path;

/// Largest input file accepted (100 MiB)
pub const MAX_INPUT_BYTES: u64 = 100 * 1024 * 1024;

/// Trait for audio decoders
pub trait Decoder: Send {
    /// Get the next decoded chunk from the stream
    fn decode_chunk(&mut self) -> AudioResult<Option<SampleBuffer>>;

    /// Check if decoder is finished
    fn is_finished(&self) -> bool;

    /// Decode everything that is left into one buffer
    fn read_to_buffer(&mut self) -> AudioResult<SampleBuffer> {
        let mut channels: Vec<Vec<f32>> = Vec::new();
        let mut sample_rate = 0;

        while let Some(chunk) = self.decode_chunk()? {
            if channels.is_empty() {
                channels = vec![Vec::new(); chunk.channel_count()];
                sample_rate = chunk.sample_rate();
            } else if chunk.channel_count() != channels.len() || chunk.sample_rate() != sample_rate
            {
                return Err(AudioError::DecodeError(
                    "stream changed format mid-way".to_string(),
                ));
            }

            for (out, ch) in channels.iter_mut().zip(chunk.channels()) {
                out.extend_from_slice(ch);
            }
        }

        if channels.is_empty() {
            return Err(AudioError::DecodeError("stream contains no audio".to_string()));
        }

        SampleBuffer::new(channels, sample_rate)
    }
}

/// Create a decoder from a file path, rejecting oversized inputs
pub fn from_file<P: AsRef<Path>>(path: P) -> AudioResult<Box<dyn Decoder>> {
    let path = path.as_ref();

    let size = std::fs::metadata(path)?.len();
    if size > MAX_INPUT_BYTES {
        return Err(AudioError::InputTooLarge {
            size,
            limit: MAX_INPUT_BYTES,
        });
    }

    SymphoniaDecoder::from_file(path).map(|d| Box::new(d) as Box<dyn Decoder>)
}

/// Decode a whole file into one buffer
pub fn decode_file<P: AsRef<Path>>(path: P) -> AudioResult<SampleBuffer> {
    from_file(path)?.read_to_buffer()
}
