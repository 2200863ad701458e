use crate::core::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use std::f64::consts::PI;

/// Cutoff for rumble removal
const HIGHPASS_CUTOFF_HZ: f64 = 80.0;
/// Share of the filtered signal mixed back into the original
const HIGHPASS_MIX: f64 = 0.2;
/// Level above which the compressor acts
const COMPRESSOR_THRESHOLD: f64 = 0.7;

/// One-pole recursive high-pass filter
///
/// `y[n] = a * (y[n-1] + x[n] - x[n-1])` with `a = rc / (rc + dt)`.
#[derive(Clone, Debug)]
pub struct HighPass {
    alpha: f64,
    prev_input: f64,
    prev_output: f64,
}

impl HighPass {
    /// Create a filter for the given cutoff and sample rate
    pub fn new(cutoff_hz: f64, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: 0 });
        }

        let rc = 1.0 / (2.0 * PI * cutoff_hz);
        let dt = 1.0 / sample_rate as f64;

        Ok(HighPass {
            alpha: rc / (rc + dt),
            prev_input: 0.0,
            prev_output: 0.0,
        })
    }

    /// Filter coefficient
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Run one sample through the filter
    pub fn run(&mut self, input: f64) -> f64 {
        let output = self.alpha * (self.prev_output + input - self.prev_input);
        self.prev_input = input;
        self.prev_output = output;
        output
    }

    /// Filter a whole channel, blending 80% dry with 20% filtered
    fn blend(&mut self, samples: &[f32]) -> Vec<f64> {
        samples
            .iter()
            .map(|&s| {
                let dry = s as f64;
                let wet = self.run(dry);
                dry * (1.0 - HIGHPASS_MIX) + wet * HIGHPASS_MIX
            })
            .collect()
    }
}

/// High-pass, first-difference emphasis, then a soft compressor, per channel
#[derive(Clone, Debug)]
pub struct VoiceEnhance {
    intensity: f32,
}

impl VoiceEnhance {
    /// Create a voice stage with intensity in 0.0..=1.0
    pub fn new(intensity: f32) -> AudioResult<Self> {
        if !(0.0..=1.0).contains(&intensity) {
            return Err(AudioError::ConfigError(format!(
                "Voice enhancement must be between 0.0 and 1.0, got {}",
                intensity
            )));
        }

        Ok(VoiceEnhance { intensity })
    }

    /// Boost high frequencies with a first difference, mixed in by intensity
    fn emphasize(samples: &mut [f64], intensity: f64) {
        let mut prev = 0.0;
        for sample in samples.iter_mut() {
            let current = *sample;
            let emphasized = current + (current - prev) * intensity * 0.3;
            *sample = current * (1.0 - intensity * 0.2) + emphasized * (intensity * 0.2);
            prev = current;
        }
    }

    /// Pull peaks above the threshold towards it, keeping 70% of the dry level
    fn compress(samples: &mut [f64], intensity: f64) {
        let ratio = 1.0 + intensity;
        for sample in samples.iter_mut() {
            let level = sample.abs();
            if level > COMPRESSOR_THRESHOLD {
                let target = COMPRESSOR_THRESHOLD + (level - COMPRESSOR_THRESHOLD) / ratio;
                let gain = target / level;
                *sample *= 0.7 + gain * 0.3;
            }
        }
    }

    fn enhance_channel(samples: &[f32], sample_rate: u32, intensity: f64) -> AudioResult<Vec<f32>> {
        let mut work = HighPass::new(HIGHPASS_CUTOFF_HZ, sample_rate)?.blend(samples);
        Self::emphasize(&mut work, intensity);
        Self::compress(&mut work, intensity);
        Ok(work.into_iter().map(|s| s as f32).collect())
    }
}

impl super::Filter for VoiceEnhance {
    fn process(&mut self, buffer: &SampleBuffer) -> AudioResult<SampleBuffer> {
        if self.intensity == 0.0 {
            return Ok(buffer.clone());
        }

        let intensity = self.intensity as f64;
        let channels = buffer
            .channels()
            .map(|ch| Self::enhance_channel(ch, buffer.sample_rate(), intensity))
            .collect::<AudioResult<Vec<_>>>()?;

        SampleBuffer::new(channels, buffer.sample_rate())
    }

    fn name(&self) -> &'static str {
        "voice enhancement"
    }
}
