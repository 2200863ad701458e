//! Enhancement pipeline and progress reporting

/// Stage orchestration
pub mod pipeline;
/// Progress notifications
pub mod progress;

pub use pipeline::{enhance, Enhancement, EnhancementPipeline, PipelineState};
pub use progress::{Progress, ProgressListener};

/// Counters collected over one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Stages that completed successfully
    pub stages_run: usize,
    /// Frames per channel handed to the pipeline
    pub frames_in: u64,
    /// Frames per channel in the returned buffer
    pub frames_out: u64,
    /// Samples read by all stages combined
    pub samples_processed: u64,
}
