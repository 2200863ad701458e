use voice_polish::filter::{Filter, NoiseGate, Normalize, SilenceTrim};
use voice_polish::{
    enhance, AudioError, AudioResult, EnhancementPipeline, PipelineState, ProcessingSettings,
    Progress, SampleBuffer,
};

const RATE: u32 = 44100;

fn settings_off() -> ProcessingSettings {
    ProcessingSettings {
        noise_reduction: 0.0,
        voice_enhancement: 0.0,
        silence_removal: false,
        volume_normalization: false,
        ..Default::default()
    }
}

/// Deterministic pseudo-random samples in -amplitude..amplitude
fn noise(len: usize, amplitude: f32, seed: u32) -> Vec<f32> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            ((state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0) * amplitude
        })
        .collect()
}

#[test]
fn test_silence_scenario() {
    // 1.5 s at 0.001 followed by 0.5 s at 0.9
    let mut samples = vec![0.001f32; 66150];
    samples.extend(std::iter::repeat_n(0.9f32, 22050));
    let input = SampleBuffer::new(vec![samples], RATE).unwrap();

    let settings = ProcessingSettings {
        silence_removal: true,
        silence_threshold: 0.01,
        ..settings_off()
    };

    let output = enhance(input, &settings, None).unwrap();

    // 1.5 s run minus 0.4 s padding each side: 0.7 s removed
    assert_eq!(output.frame_count(), 88200 - 30870);
    assert!((output.duration().as_secs_f64() - 1.3).abs() < 1e-9);
    let ch = output.channel(0).unwrap();
    assert_eq!(ch[17639], 0.001);
    assert_eq!(ch[35279], 0.001);
    assert_eq!(ch[35280], 0.9);
}

#[test]
fn test_normalize_scenario() {
    let mut samples = noise(44100, 0.2, 7);
    samples[1000] = 0.4;
    samples[2000] = -0.35;
    let input = SampleBuffer::new(vec![samples], RATE).unwrap();

    let settings = ProcessingSettings {
        noise_reduction: 0.4,
        volume_normalization: true,
        target_volume: 0.8,
        ..settings_off()
    };

    let mut seen = Vec::new();
    let mut listener = |p: Progress| seen.push(p);
    let output = enhance(input, &settings, Some(&mut listener)).unwrap();

    let ch = output.channel(0).unwrap();
    assert!((output.peak() - 0.76).abs() < 1e-6);
    assert!((ch[1000] - 0.76).abs() < 1e-6);
    assert!((ch[2000] + 0.665).abs() < 1e-6);
    assert_eq!(
        seen,
        vec![
            Progress::Starting,
            Progress::ReducingNoise,
            Progress::Normalizing,
            Progress::Complete,
        ]
    );
}

#[test]
fn test_disabled_gate_is_identity() {
    let input = SampleBuffer::new(vec![noise(5000, 0.5, 1), noise(5000, 0.5, 2)], RATE).unwrap();
    let output = enhance(input.clone(), &settings_off(), None).unwrap();
    assert_eq!(output, input);
}

#[test]
fn test_gate_never_amplifies() {
    let input = SampleBuffer::new(vec![noise(20000, 0.8, 3), noise(20000, 0.05, 4)], RATE).unwrap();

    for intensity in [0.1, 0.5, 1.0] {
        let output = NoiseGate::new(intensity).unwrap().process(&input).unwrap();
        for (out_ch, in_ch) in output.channels().zip(input.channels()) {
            for (o, i) in out_ch.iter().zip(in_ch) {
                assert!(o.abs() <= i.abs());
            }
        }
    }
}

#[test]
fn test_normalize_hits_target_or_leaves_alone() {
    for peak in [0.05f32, 0.3, 0.6, 0.7, 0.75, 0.9, 1.0, 1.6] {
        for target in [0.5f32, 0.8, 1.0] {
            let mut samples = noise(1000, peak * 0.5, 11);
            samples[500] = -peak;
            let input = SampleBuffer::new(vec![samples], RATE).unwrap();

            let output = Normalize::peak(target).unwrap().process(&input).unwrap();
            let factor = 0.95 * target / peak;

            if (factor - 1.0).abs() >= 0.2 {
                assert!(
                    (output.peak() - 0.95 * target).abs() < 1e-6,
                    "peak {} target {}",
                    peak,
                    target
                );
            } else {
                assert_eq!(output, input, "peak {} target {}", peak, target);
            }
        }
    }
}

#[test]
fn test_silence_trim_only_shrinks() {
    let mut loud_then_quiet = noise(RATE as usize, 0.5, 5);
    loud_then_quiet.extend(std::iter::repeat_n(0.0, 2 * RATE as usize));
    loud_then_quiet.extend(noise(RATE as usize, 0.5, 6));

    let cases = [
        (noise(3 * RATE as usize, 0.5, 8), false),
        (loud_then_quiet, true),
    ];

    for (samples, should_shrink) in cases {
        let input = SampleBuffer::new(vec![samples.clone(), samples], RATE).unwrap();
        let output = SilenceTrim::new(0.01).unwrap().process(&input).unwrap();

        assert!(output.frame_count() <= input.frame_count());
        assert_eq!(output.frame_count() < input.frame_count(), should_shrink);
        assert_eq!(output.channel(0), output.channel(1));
    }
}

#[test]
fn test_full_default_run() {
    let mut speech = noise(RATE as usize, 0.3, 9);
    speech.extend(noise(2 * RATE as usize, 0.001, 10));
    speech.extend(noise(RATE as usize, 0.3, 12));
    let input = SampleBuffer::new(vec![speech.clone(), speech], RATE).unwrap();

    let mut pipeline = EnhancementPipeline::new(&ProcessingSettings::default()).unwrap();
    let result = pipeline.run(input, None);

    assert_eq!(result.state, PipelineState::Done);
    assert_eq!(result.stats.stages_run, 4);
    assert!(result.buffer.frame_count() < 4 * RATE as usize);
    assert!(result.buffer.peak() <= 0.8);
}

struct Broken;

impl Filter for Broken {
    fn process(&mut self, buffer: &SampleBuffer) -> AudioResult<SampleBuffer> {
        // A stage that returns a different channel layout
        SampleBuffer::new(vec![buffer.channel(0).unwrap().to_vec()], buffer.sample_rate())
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

#[test]
fn test_malformed_stage_output_falls_back() {
    let input = SampleBuffer::new(vec![noise(4000, 0.3, 13), noise(4000, 0.3, 14)], RATE).unwrap();
    let mut pipeline = EnhancementPipeline::new(&ProcessingSettings::default())
        .unwrap()
        .with_stage(PipelineState::VoiceEnhance, Box::new(Broken))
        .unwrap();

    let mut seen = Vec::new();
    let mut listener = |p: Progress| seen.push(p);
    let result = pipeline.run(input.clone(), Some(&mut listener));

    assert_eq!(result.buffer, input);
    assert!(matches!(
        result.error,
        Some(AudioError::StageFailure { stage: "broken", .. })
    ));
    assert_eq!(
        seen,
        vec![
            Progress::Starting,
            Progress::ReducingNoise,
            Progress::EnhancingVoice,
            Progress::Failed,
        ]
    );
}

#[test]
fn test_invalid_buffer_rejected_up_front() {
    assert!(matches!(
        SampleBuffer::new(vec![vec![0.1; 10], vec![0.1; 9]], RATE),
        Err(AudioError::InvalidBuffer(_))
    ));
}
