use crate::error::{AudioError, AudioResult};

/// Per-run enhancement configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingSettings {
    /// Noise gate aggressiveness (0.0 disables the gate)
    pub noise_reduction: f32,
    /// Voice filter/emphasis/compression strength (0.0 disables it)
    pub voice_enhancement: f32,
    /// Whether long pauses are cut
    pub silence_removal: bool,
    /// RMS level below which a window counts as quiet
    pub silence_threshold: f32,
    /// Whether the result is peak-normalized
    pub volume_normalization: bool,
    /// Desired peak after normalization
    pub target_volume: f32,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        ProcessingSettings {
            noise_reduction: 0.2,
            voice_enhancement: 0.3,
            silence_removal: true,
            silence_threshold: 0.005,
            volume_normalization: true,
            target_volume: 0.8,
        }
    }
}

/// Named starting points for common recordings
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Spoken-word shows: firmer gate, pauses cut
    Podcast,
    /// Light touch, pauses kept, slightly louder
    Music,
    /// Noisy two-person recordings: strongest gate and voice
    Interview,
    /// Defaults without pause removal
    Gentle,
}

impl Preset {
    /// Every preset, in display order
    pub const ALL: [Preset; 4] = [
        Preset::Podcast,
        Preset::Music,
        Preset::Interview,
        Preset::Gentle,
    ];
}

impl ProcessingSettings {
    /// Settings for a named preset
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Podcast => ProcessingSettings {
                noise_reduction: 0.4,
                voice_enhancement: 0.5,
                silence_threshold: 0.008,
                ..Self::default()
            },
            Preset::Music => ProcessingSettings {
                silence_removal: false,
                target_volume: 0.85,
                ..Self::default()
            },
            Preset::Interview => ProcessingSettings {
                noise_reduction: 0.5,
                voice_enhancement: 0.6,
                silence_threshold: 0.01,
                target_volume: 0.75,
                ..Self::default()
            },
            Preset::Gentle => ProcessingSettings {
                silence_removal: false,
                ..Self::default()
            },
        }
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> AudioResult<()> {
        check_range("noise_reduction", self.noise_reduction, |v| (0.0..=1.0).contains(&v))?;
        check_range("voice_enhancement", self.voice_enhancement, |v| {
            (0.0..=1.0).contains(&v)
        })?;
        check_range("silence_threshold", self.silence_threshold, |v| v > 0.0 && v < 1.0)?;
        check_range("target_volume", self.target_volume, |v| v > 0.0 && v <= 1.0)?;
        Ok(())
    }

    /// Whether the noise gate runs
    pub fn noise_gate_enabled(&self) -> bool {
        self.noise_reduction > 0.0
    }

    /// Whether the voice stage runs
    pub fn voice_enabled(&self) -> bool {
        self.voice_enhancement > 0.0
    }
}

fn check_range(name: &str, value: f32, ok: impl Fn(f32) -> bool) -> AudioResult<()> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(AudioError::ConfigError(format!(
            "{} out of range, got {}",
            name, value
        )))
    }
}
