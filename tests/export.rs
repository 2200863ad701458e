use std::io::Cursor;
use tempfile::TempDir;
use voice_polish::decoder;
use voice_polish::encoder::{encode_wav, Encoder, WavEncoder};
use voice_polish::{enhance, ProcessingSettings, SampleBuffer};

fn sweep(len: usize, phase: f32) -> Vec<f32> {
    (0..len)
        .map(|i| ((i as f32 * 0.013 + phase).sin() * 1.1).clamp(-1.0, 1.0))
        .collect()
}

#[test]
fn test_wav_bytes_read_back() {
    let buffer = SampleBuffer::new(vec![sweep(3000, 0.0), sweep(3000, 1.0)], 22050).unwrap();
    let bytes = encode_wav(&buffer).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.duration(), 3000);

    let decoded: Vec<f32> = reader
        .samples::<i16>()
        .map(|s| s.unwrap() as f32 / 32767.0)
        .collect();

    for (original, restored) in buffer.interleaved().iter().zip(&decoded) {
        assert!((original - restored).abs() <= 1.0 / 32767.0);
    }
}

#[test]
fn test_out_of_range_samples_clip() {
    let buffer = SampleBuffer::new(vec![vec![2.5, -3.0, 0.0]], 8000).unwrap();
    let bytes = encode_wav(&buffer).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
    assert_eq!(samples, vec![32767, -32767, 0]);
}

#[test]
fn test_enhance_export_and_decode() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("enhanced_take.wav");

    let input = SampleBuffer::new(vec![sweep(44100, 0.0)], 44100).unwrap();
    let output = enhance(input, &ProcessingSettings::default(), None).unwrap();

    let mut encoder = WavEncoder::new(&path, output.sample_rate(), output.channel_count()).unwrap();
    encoder.encode(&output).unwrap();
    encoder.finalize().unwrap();

    let restored = decoder::decode_file(&path).unwrap();
    assert_eq!(restored.sample_rate(), 44100);
    assert_eq!(restored.channel_count(), 1);
    assert_eq!(restored.frame_count(), output.frame_count());

    for (a, b) in output.channel(0).unwrap().iter().zip(restored.channel(0).unwrap()) {
        assert!((a.clamp(-1.0, 1.0) - b).abs() < 1e-3);
    }
}

#[test]
fn test_decode_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(decoder::decode_file(dir.path().join("missing.wav")).is_err());
}
