use crate::core::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use log::debug;

/// Fraction of the target actually aimed for
const HEADROOM: f64 = 0.95;
/// Gain factors strictly inside this range are not applied
const DEADBAND: (f64, f64) = (0.8, 1.2);

/// Audio normalization filter - scales the whole buffer to a target peak
#[derive(Clone, Debug)]
pub struct Normalize {
    /// Target peak level (0.0 to 1.0)
    target_peak: f32,
}

impl Normalize {
    /// Create a peak normalizer (normalizes to 95% of the target peak level)
    pub fn peak(target_peak: f32) -> AudioResult<Self> {
        if !(target_peak > 0.0 && target_peak <= 1.0) {
            return Err(AudioError::ConfigError(format!(
                "Target peak must be between 0.0 and 1.0, got {}",
                target_peak
            )));
        }

        Ok(Normalize { target_peak })
    }

    /// Gain that would bring `peak` to the safe target
    ///
    /// Computed in f64: a subnormal f32 peak would overflow an f32 gain.
    pub fn factor_for(&self, peak: f32) -> f64 {
        if peak > 0.0 {
            self.target_peak as f64 * HEADROOM / peak as f64
        } else {
            1.0
        }
    }

    /// Whether a gain is too small a change to bother applying
    fn in_deadband(factor: f64) -> bool {
        factor > DEADBAND.0 && factor < DEADBAND.1
    }
}

impl super::Filter for Normalize {
    fn process(&mut self, buffer: &SampleBuffer) -> AudioResult<SampleBuffer> {
        let peak = buffer.peak();
        let factor = self.factor_for(peak);

        if Self::in_deadband(factor) {
            debug!("peak {:.4}, factor {:.4} inside deadband, left as is", peak, factor);
            return Ok(buffer.clone());
        }

        debug!("peak {:.4}, scaling by {:.4}", peak, factor);
        buffer.map_channels(|ch| ch.iter().map(|&s| (s as f64 * factor) as f32).collect())
    }

    fn name(&self) -> &'static str {
        "normalize"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    fn mono(samples: Vec<f32>) -> SampleBuffer {
        SampleBuffer::new(vec![samples], 44100).unwrap()
    }

    #[test]
    fn test_peak_normalization() {
        let mut normalizer = Normalize::peak(0.8).unwrap();

        // Peak 0.4 needs a factor of 1.9
        let frame = mono(vec![0.0, 0.2, 0.4, -0.3]);
        let result = normalizer.process(&frame).unwrap();

        assert!((result.peak() - 0.76).abs() < 1e-6);
        assert!((result.channel(0).unwrap()[3] + 0.57).abs() < 1e-6);
    }

    #[test]
    fn test_attenuates_loud_input() {
        let mut normalizer = Normalize::peak(0.5).unwrap();
        let result = normalizer.process(&mono(vec![1.0, -0.5])).unwrap();
        assert!((result.peak() - 0.475).abs() < 1e-6);
    }

    #[test]
    fn test_deadband_leaves_buffer() {
        let mut normalizer = Normalize::peak(0.8).unwrap();

        // 0.76 / 0.7 ~ 1.086, inside the deadband
        let frame = mono(vec![0.1, -0.7, 0.5]);
        assert_eq!(normalizer.process(&frame).unwrap(), frame);
    }

    #[test]
    fn test_silence_handling() {
        let mut normalizer = Normalize::peak(0.8).unwrap();

        // Should handle silence gracefully (no division by zero)
        let frame = mono(vec![0.0, 0.0, 0.0]);
        let result = normalizer.process(&frame).unwrap();
        assert_eq!(result.channel(0).unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_peak_spans_channels() {
        let mut normalizer = Normalize::peak(1.0).unwrap();
        let frame = SampleBuffer::new(vec![vec![0.1, 0.1], vec![0.2, -0.25]], 8000).unwrap();
        let result = normalizer.process(&frame).unwrap();

        // factor 0.95 / 0.25 = 3.8 applied to both channels
        assert!((result.channel(0).unwrap()[0] - 0.38).abs() < 1e-6);
        assert!((result.channel(1).unwrap()[1] + 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_subnormal_peak() {
        let mut normalizer = Normalize::peak(0.8).unwrap();

        // 0.76 / 1e-39 does not fit in an f32
        assert!(normalizer.factor_for(1e-39) > f32::MAX as f64);

        let frame = mono(vec![1e-39, 0.0, -5e-40]);
        let result = normalizer.process(&frame).unwrap();
        let out = result.channel(0).unwrap();

        assert!((result.peak() - 0.76).abs() < 1e-6);
        assert_eq!(out[1], 0.0);
        assert!((out[2] + 0.38).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_target() {
        assert!(Normalize::peak(0.0).is_err());
        assert!(Normalize::peak(1.5).is_err());
        assert!(Normalize::peak(1.0).is_ok());
    }
}
