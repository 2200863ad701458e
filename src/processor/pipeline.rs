use super::progress::{Progress, ProgressListener};
use super::ProcessingStats;
use crate::core::{ProcessingSettings, SampleBuffer};
use crate::error::{AudioError, AudioResult};
use crate::filter::{Filter, NoiseGate, Normalize, SilenceTrim, VoiceEnhance};
use log::{debug, info, warn};
use std::panic::{self, AssertUnwindSafe};

/// Pipeline states, in the order they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    /// Nothing has run yet
    Idle,
    /// Noise gate running
    NoiseGate,
    /// Voice stage running
    VoiceEnhance,
    /// Silence trim running
    SilenceTrim,
    /// Normalization running
    Normalize,
    /// Every enabled stage succeeded
    Done,
    /// A stage failed; the input is returned untouched
    Failed,
}

impl PipelineState {
    /// Notification emitted on entering this state
    pub fn progress(&self) -> Progress {
        match self {
            PipelineState::Idle => Progress::Starting,
            PipelineState::NoiseGate => Progress::ReducingNoise,
            PipelineState::VoiceEnhance => Progress::EnhancingVoice,
            PipelineState::SilenceTrim => Progress::RemovingPauses,
            PipelineState::Normalize => Progress::Normalizing,
            PipelineState::Done => Progress::Complete,
            PipelineState::Failed => Progress::Failed,
        }
    }

    fn is_stage(&self) -> bool {
        !matches!(
            self,
            PipelineState::Idle | PipelineState::Done | PipelineState::Failed
        )
    }
}

/// Result of one pipeline run
#[derive(Debug)]
pub struct Enhancement {
    /// Enhanced audio, or the untouched input when the run failed
    pub buffer: SampleBuffer,
    /// Terminal state, `Done` or `Failed`
    pub state: PipelineState,
    /// Why the run failed, if it did
    pub error: Option<AudioError>,
    /// Counters for the run
    pub stats: ProcessingStats,
}

type Stage = (PipelineState, Box<dyn Filter + Send>);

/// Runs the enabled stages in order: noise gate, voice, silence trim, normalize
///
/// Each stage reads the previous stage's buffer and builds a new one. If any
/// stage fails (returns an error, panics, or hands back a malformed buffer)
/// the run ends in [`PipelineState::Failed`] and the caller gets the original
/// input back.
pub struct EnhancementPipeline {
    stages: Vec<Stage>,
}

impl EnhancementPipeline {
    /// Build the stages enabled by `settings`
    pub fn new(settings: &ProcessingSettings) -> AudioResult<Self> {
        settings.validate()?;

        let mut stages: Vec<Stage> = Vec::with_capacity(4);
        if settings.noise_gate_enabled() {
            stages.push((
                PipelineState::NoiseGate,
                Box::new(NoiseGate::new(settings.noise_reduction)?),
            ));
        }
        if settings.voice_enabled() {
            stages.push((
                PipelineState::VoiceEnhance,
                Box::new(VoiceEnhance::new(settings.voice_enhancement)?),
            ));
        }
        if settings.silence_removal {
            stages.push((
                PipelineState::SilenceTrim,
                Box::new(SilenceTrim::new(settings.silence_threshold)?),
            ));
        }
        if settings.volume_normalization {
            stages.push((
                PipelineState::Normalize,
                Box::new(Normalize::peak(settings.target_volume)?),
            ));
        }

        Ok(EnhancementPipeline { stages })
    }

    /// Use `filter` for the given stage, enabling it if it was off
    ///
    /// `Idle`, `Done` and `Failed` are not stages and are rejected.
    pub fn with_stage(
        mut self,
        state: PipelineState,
        filter: Box<dyn Filter + Send>,
    ) -> AudioResult<Self> {
        if !state.is_stage() {
            return Err(AudioError::ConfigError(format!(
                "{:?} is not a processing stage",
                state
            )));
        }

        match self.stages.iter_mut().find(|(s, _)| *s == state) {
            Some(slot) => slot.1 = filter,
            None => {
                self.stages.push((state, filter));
                self.stages.sort_by_key(|(s, _)| *s);
            }
        }
        Ok(self)
    }

    /// Stages that will run, in order
    pub fn stages(&self) -> Vec<PipelineState> {
        self.stages.iter().map(|(s, _)| *s).collect()
    }

    /// Run the pipeline and return only the resulting buffer
    pub fn enhance(
        &mut self,
        input: SampleBuffer,
        listener: Option<&mut dyn ProgressListener>,
    ) -> SampleBuffer {
        self.run(input, listener).buffer
    }

    /// Run every stage over `input`
    pub fn run(
        &mut self,
        input: SampleBuffer,
        mut listener: Option<&mut dyn ProgressListener>,
    ) -> Enhancement {
        let mut stats = ProcessingStats {
            frames_in: input.frame_count() as u64,
            ..Default::default()
        };

        notify(&mut listener, PipelineState::Idle.progress());

        match self.run_stages(&input, &mut listener, &mut stats) {
            Ok(output) => {
                let buffer = output.unwrap_or(input);
                stats.frames_out = buffer.frame_count() as u64;

                info!(
                    "enhancement complete: {} stage(s), {} -> {} frames",
                    stats.stages_run, stats.frames_in, stats.frames_out
                );
                notify(&mut listener, PipelineState::Done.progress());

                Enhancement {
                    buffer,
                    state: PipelineState::Done,
                    error: None,
                    stats,
                }
            }
            Err(err) => {
                stats.frames_out = stats.frames_in;

                warn!("{}, returning original audio", err);
                notify(&mut listener, PipelineState::Failed.progress());

                Enhancement {
                    buffer: input,
                    state: PipelineState::Failed,
                    error: Some(err),
                    stats,
                }
            }
        }
    }

    /// Returns `None` when no stage is enabled
    fn run_stages(
        &mut self,
        input: &SampleBuffer,
        listener: &mut Option<&mut dyn ProgressListener>,
        stats: &mut ProcessingStats,
    ) -> AudioResult<Option<SampleBuffer>> {
        let mut output: Option<SampleBuffer> = None;
        let mut previous = PipelineState::Idle;

        for (state, filter) in self.stages.iter_mut() {
            debug!("{:?} -> {:?}", previous, state);
            notify(listener, state.progress());

            let source = output.as_ref().unwrap_or(input);
            let name = filter.name();

            let next = panic::catch_unwind(AssertUnwindSafe(|| filter.process(source)))
                .map_err(|payload| AudioError::stage(name, panic_message(&*payload)))?
                .map_err(|err| match err {
                    AudioError::StageFailure { .. } => err,
                    other => AudioError::stage(name, other.to_string()),
                })?;

            check_output(name, source, &next)?;

            stats.samples_processed += (source.frame_count() * source.channel_count()) as u64;
            stats.stages_run += 1;
            previous = *state;
            output = Some(next);
        }

        debug!("{:?} -> {:?}", previous, PipelineState::Done);
        Ok(output)
    }
}

fn notify(listener: &mut Option<&mut dyn ProgressListener>, progress: Progress) {
    if let Some(l) = listener.as_deref_mut() {
        l.on_progress(progress);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

/// Reject outputs a stage had no business producing
///
/// Non-finite samples never get this far: `SampleBuffer` refuses them at
/// construction, so a stage that produces one fails inside `process`.
fn check_output(
    stage: &'static str,
    source: &SampleBuffer,
    output: &SampleBuffer,
) -> AudioResult<()> {
    if output.sample_rate() != source.sample_rate() {
        return Err(AudioError::stage(
            stage,
            format!(
                "sample rate changed from {} to {}",
                source.sample_rate(),
                output.sample_rate()
            ),
        ));
    }

    if output.channel_count() != source.channel_count() {
        return Err(AudioError::stage(
            stage,
            format!(
                "channel count changed from {} to {}",
                source.channel_count(),
                output.channel_count()
            ),
        ));
    }

    if output.frame_count() > source.frame_count() {
        return Err(AudioError::stage(
            stage,
            format!(
                "frame count grew from {} to {}",
                source.frame_count(),
                output.frame_count()
            ),
        ));
    }

    Ok(())
}

/// Enhance `buffer` with `settings` in one call
///
/// Invalid settings are rejected before any stage runs. Stage failures never
/// surface here: they produce the original buffer and a
/// [`Progress::Failed`] notification. `buffer` is already known to hold only
/// finite samples, so a failure always points at a stage.
pub fn enhance(
    buffer: SampleBuffer,
    settings: &ProcessingSettings,
    listener: Option<&mut dyn ProgressListener>,
) -> AudioResult<SampleBuffer> {
    Ok(EnhancementPipeline::new(settings)?.enhance(buffer, listener))
}
