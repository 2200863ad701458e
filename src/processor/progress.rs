use std::fmt;

/// Progress notifications emitted while a pipeline runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Emitted once before any stage
    Starting,
    /// Noise gate is about to run
    ReducingNoise,
    /// Voice stage is about to run
    EnhancingVoice,
    /// Silence trim is about to run
    RemovingPauses,
    /// Normalization is about to run
    Normalizing,
    /// All enabled stages finished
    Complete,
    /// A stage failed and the original audio is returned
    Failed,
}

impl Progress {
    /// User-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Progress::Starting => "Starting enhancement...",
            Progress::ReducingNoise => "Reducing background noise...",
            Progress::EnhancingVoice => "Enhancing voice clarity...",
            Progress::RemovingPauses => "Removing long pauses...",
            Progress::Normalizing => "Normalizing audio levels...",
            Progress::Complete => "Enhancement complete!",
            Progress::Failed => "Enhancement failed - using original audio",
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives progress notifications, synchronously and in order
pub trait ProgressListener {
    /// Called once per notification
    fn on_progress(&mut self, progress: Progress);
}

impl<F: FnMut(Progress)> ProgressListener for F {
    fn on_progress(&mut self, progress: Progress) {
        self(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Progress::Starting.to_string(), "Starting enhancement...");
        assert_eq!(
            Progress::Failed.label(),
            "Enhancement failed - using original audio"
        );
    }

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |p: Progress| seen.push(p);
            listener.on_progress(Progress::Normalizing);
            listener.on_progress(Progress::Complete);
        }
        assert_eq!(seen, vec![Progress::Normalizing, Progress::Complete]);
    }
}
