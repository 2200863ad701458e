use crate::error::{AudioError, AudioResult};
use std::time::Duration;

/// Planar PCM audio: one equal-length sample sequence per channel
///
/// Construction validates that there is at least one channel, at least one
/// frame, a non-zero sample rate, that every channel has the same length and
/// that every sample is finite.
/// A buffer is never mutated once built; stages read one and build another.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Per-channel samples, nominally in -1.0..=1.0
    channels: Vec<Vec<f32>>,
    /// Sample rate in Hz (e.g., 44100, 48000, 16000)
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a buffer from planar channel data
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        let Some(first) = channels.first() else {
            return Err(AudioError::InvalidBuffer("buffer has no channels".to_string()));
        };

        let frame_count = first.len();
        if frame_count == 0 {
            return Err(AudioError::InvalidBuffer("buffer has no frames".to_string()));
        }

        if let Some((index, ch)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != frame_count)
        {
            return Err(AudioError::InvalidBuffer(format!(
                "channel {} has {} frames, channel 0 has {}",
                index,
                ch.len(),
                frame_count
            )));
        }

        if let Some(index) = channels
            .iter()
            .position(|ch| ch.iter().any(|s| !s.is_finite()))
        {
            return Err(AudioError::InvalidBuffer(format!(
                "channel {} contains non-finite samples",
                index
            )));
        }

        Ok(SampleBuffer {
            channels,
            sample_rate,
        })
    }

    /// Create a buffer from interleaved (frame-major) samples
    pub fn from_interleaved(
        samples: &[f32],
        channel_count: usize,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        if channel_count == 0 {
            return Err(AudioError::InvalidBuffer("buffer has no channels".to_string()));
        }

        if samples.len() % channel_count != 0 {
            return Err(AudioError::InvalidBuffer(
                "Sample count not divisible by channel count".to_string(),
            ));
        }

        let frame_count = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (ch, &sample) in channels.iter_mut().zip(frame) {
                ch.push(sample);
            }
        }

        Self::new(channels, sample_rate)
    }

    /// Build a buffer with the same rate and channel count, transforming
    /// each channel independently
    pub fn map_channels<F>(&self, mut f: F) -> AudioResult<Self>
    where
        F: FnMut(&[f32]) -> Vec<f32>,
    {
        let channels = self.channels.iter().map(|ch| f(ch)).collect();
        Self::new(channels, self.sample_rate)
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Get number of samples per channel
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    /// Get the samples of one channel
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Iterate over all channels in order
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// Take ownership of the planar channel data
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Samples interleaved frame by frame
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frame_count() * self.channel_count());
        for frame in 0..self.frame_count() {
            for ch in &self.channels {
                out.push(ch[frame]);
            }
        }
        out
    }

    /// Largest absolute sample value over every channel
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .map(|&s| s.abs())
            .fold(0.0f32, |a, b| a.max(b))
    }

    /// Get duration of this buffer
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count() as f64 / self.sample_rate as f64)
    }
}
