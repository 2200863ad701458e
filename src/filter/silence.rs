use crate::core::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use log::debug;

/// Length of one RMS analysis window
const WINDOW_SECS: f64 = 0.1;
/// Shortest quiet run that counts as a pause
const MIN_SILENCE_SECS: f64 = 1.0;
/// Quiet audio kept at each edge of a removed pause
const PADDING_SECS: f64 = 0.4;
/// Below this much total removal the buffer is left alone
const MIN_REMOVED_SECS: f64 = 0.5;

/// A half-open frame range `[start, end)` to cut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilenceRegion {
    /// First removed frame
    pub start: usize,
    /// One past the last removed frame
    pub end: usize,
}

impl SilenceRegion {
    /// Number of frames in the region
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the region removes nothing
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Pause remover
///
/// Channel 0 is scanned in consecutive 100 ms windows. Runs of quiet windows
/// lasting at least one second are cut from every channel, minus 400 ms of
/// padding on each side. Nothing is cut unless at least half a second would
/// go in total.
#[derive(Clone, Debug)]
pub struct SilenceTrim {
    threshold: f32,
}

impl SilenceTrim {
    /// Create a trimmer with an RMS threshold in (0.0, 1.0)
    pub fn new(threshold: f32) -> AudioResult<Self> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(AudioError::ConfigError(format!(
                "Silence threshold must be between 0.0 and 1.0, got {}",
                threshold
            )));
        }

        Ok(SilenceTrim { threshold })
    }

    fn rms(window: &[f32]) -> f64 {
        let sum_squared: f64 = window.iter().map(|&s| s as f64 * s as f64).sum();
        (sum_squared / window.len() as f64).sqrt()
    }

    /// Find removable regions in the reference channel, in ascending order
    ///
    /// Only windows starting before `len - window` are examined, and a quiet
    /// run is closed by the first loud window after it; a run still open when
    /// the scan ends is kept.
    pub fn find_regions(&self, reference: &[f32], sample_rate: u32) -> Vec<SilenceRegion> {
        let rate = sample_rate as f64;
        let window = (WINDOW_SECS * rate).floor() as usize;
        let min_silence = (MIN_SILENCE_SECS * rate).floor() as usize;
        let padding = (PADDING_SECS * rate).floor() as usize;

        let mut regions = Vec::new();
        if window == 0 || reference.len() <= window {
            return regions;
        }

        let threshold = self.threshold as f64;
        let mut silence_start: Option<usize> = None;

        for start in (0..reference.len() - window).step_by(window) {
            let quiet = Self::rms(&reference[start..start + window]) < threshold;

            match (quiet, silence_start) {
                (true, None) => silence_start = Some(start),
                (false, Some(run_start)) => {
                    if start - run_start >= min_silence {
                        let region = SilenceRegion {
                            start: run_start + padding,
                            end: start.saturating_sub(padding),
                        };
                        if !region.is_empty() {
                            regions.push(region);
                        }
                    }
                    silence_start = None;
                }
                _ => {}
            }
        }

        regions
    }

    /// Copy every channel, skipping the given regions
    fn splice(buffer: &SampleBuffer, regions: &[SilenceRegion]) -> AudioResult<SampleBuffer> {
        let removed: usize = regions.iter().map(SilenceRegion::len).sum();
        let new_len = buffer.frame_count() - removed;

        buffer.map_channels(|ch| {
            let mut out = Vec::with_capacity(new_len);
            let mut pos = 0;
            for region in regions {
                out.extend_from_slice(&ch[pos..region.start]);
                pos = region.end;
            }
            out.extend_from_slice(&ch[pos..]);
            out
        })
    }
}

impl super::Filter for SilenceTrim {
    fn process(&mut self, buffer: &SampleBuffer) -> AudioResult<SampleBuffer> {
        let reference = buffer
            .channel(0)
            .ok_or_else(|| AudioError::stage(self.name(), "buffer has no reference channel"))?;

        let regions = self.find_regions(reference, buffer.sample_rate());
        let removed: usize = regions.iter().map(SilenceRegion::len).sum();

        debug!(
            "{} silence region(s) found, {} frames removable",
            regions.len(),
            removed
        );

        if regions.is_empty() || (removed as f64) < buffer.sample_rate() as f64 * MIN_REMOVED_SECS {
            return Ok(buffer.clone());
        }

        Self::splice(buffer, &regions)
    }

    fn name(&self) -> &'static str {
        "silence trim"
    }
}
