use crate::core::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use log::debug;

/// Percentile of sorted magnitudes taken as the noise floor
const NOISE_FLOOR_PERCENTILE: f64 = 0.2;

/// Soft per-sample noise gate
///
/// Each channel's noise floor is the 20th percentile of its absolute sample
/// values. Samples below `floor * (1 + 3 * intensity)` are scaled down by the
/// square root of how far below the threshold they sit, so the gate never
/// hard-mutes and never makes a sample louder.
#[derive(Clone, Debug)]
pub struct NoiseGate {
    intensity: f32,
}

impl NoiseGate {
    /// Create a gate with intensity in 0.0..=1.0
    pub fn new(intensity: f32) -> AudioResult<Self> {
        if !(0.0..=1.0).contains(&intensity) {
            return Err(AudioError::ConfigError(format!(
                "Noise reduction must be between 0.0 and 1.0, got {}",
                intensity
            )));
        }

        Ok(NoiseGate { intensity })
    }

    /// Magnitude at the 20th percentile of the channel
    fn noise_floor(samples: &[f32]) -> f32 {
        let mut magnitudes: Vec<f32> = samples.iter().map(|s| s.abs()).collect();
        magnitudes.sort_unstable_by(f32::total_cmp);
        let index = (magnitudes.len() as f64 * NOISE_FLOOR_PERCENTILE).floor() as usize;
        magnitudes[index.min(magnitudes.len() - 1)]
    }

    fn gate_channel(samples: &[f32], intensity: f64) -> Vec<f32> {
        let noise_floor = Self::noise_floor(samples) as f64;
        let threshold = noise_floor * (1.0 + 3.0 * intensity);
        let depth = 1.0 - 0.5 * intensity;

        debug!("noise floor {:.6}, gate threshold {:.6}", noise_floor, threshold);

        samples
            .iter()
            .map(|&s| {
                let level = s.abs() as f64;
                if level < threshold {
                    let reduction = (level / threshold).sqrt();
                    (s as f64 * reduction * depth) as f32
                } else {
                    s
                }
            })
            .collect()
    }
}

impl super::Filter for NoiseGate {
    fn process(&mut self, buffer: &SampleBuffer) -> AudioResult<SampleBuffer> {
        if self.intensity == 0.0 {
            return Ok(buffer.clone());
        }

        let intensity = self.intensity as f64;
        buffer.map_channels(|ch| Self::gate_channel(ch, intensity))
    }

    fn name(&self) -> &'static str {
        "noise gate"
    }
}
