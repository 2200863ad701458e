use crate::core::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use log::warn;
use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Size of the RIFF/fmt/data header
pub const HEADER_LEN: usize = 44;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = (BITS_PER_SAMPLE / 8) as usize;
const FORMAT_PCM: u16 = 1;
/// Byte offsets of the RIFF and data sizes inside the header
const RIFF_SIZE_OFFSET: u64 = 4;
const DATA_SIZE_OFFSET: u64 = 40;

/// Quantize one sample to signed 16-bit, clipping to -1.0..=1.0 first
pub fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

fn write_header(buf: &mut Vec<u8>, channel_count: u16, sample_rate: u32, data_len: u32) {
    let block_align = channel_count * (BITS_PER_SAMPLE / 8);
    let byte_rate = sample_rate.saturating_mul(block_align as u32);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_len).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt sub-chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    buf.extend_from_slice(&channel_count.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data sub-chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_len.to_le_bytes());
}

/// Channel count as stored in the header; block_align must fit a u16
fn header_channels(count: usize) -> AudioResult<u16> {
    u16::try_from(count)
        .ok()
        .filter(|&c| c > 0 && c <= u16::MAX / 2)
        .ok_or_else(|| {
            AudioError::EncodeError(format!("{} channels do not fit a WAV header", count))
        })
}

/// Data chunk size for `frames` frames, if the RIFF size still fits a u32
fn data_len(frames: usize, channel_count: usize) -> AudioResult<u32> {
    frames
        .checked_mul(channel_count * BYTES_PER_SAMPLE)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| n.checked_add(36).is_some())
        .ok_or_else(|| AudioError::EncodeError("audio too long for a WAV file".to_string()))
}

/// Write quantized samples frame by frame, little-endian
fn write_samples<W: Write>(out: &mut W, buffer: &SampleBuffer) -> io::Result<()> {
    let channels: Vec<&[f32]> = buffer.channels().collect();
    for frame in 0..buffer.frame_count() {
        for ch in &channels {
            out.write_all(&quantize(ch[frame]).to_le_bytes())?;
        }
    }
    Ok(())
}

/// Serialize a buffer as canonical 16-bit PCM WAV bytes
///
/// Samples are interleaved frame by frame, little-endian.
pub fn encode_wav(buffer: &SampleBuffer) -> AudioResult<Vec<u8>> {
    let channel_count = header_channels(buffer.channel_count())?;
    let data_len = data_len(buffer.frame_count(), buffer.channel_count())?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + data_len as usize);
    write_header(&mut bytes, channel_count, buffer.sample_rate(), data_len);
    write_samples(&mut bytes, buffer)?;

    Ok(bytes)
}

/// WAV file encoder
///
/// The header is written on creation with zero sizes, samples are streamed
/// as they arrive and the sizes are patched in on finalize. Dropping an
/// encoder that was not finalized finalizes it.
pub struct WavEncoder {
    writer: Option<BufWriter<File>>,
    sample_rate: u32,
    channel_count: usize,
    frames_written: usize,
}

impl WavEncoder {
    /// Create a new WAV encoder to file
    pub fn new<P: AsRef<Path>>(
        path: P,
        sample_rate: u32,
        channel_count: usize,
    ) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: 0 });
        }
        let stored_channels = header_channels(channel_count)?;

        let mut header = Vec::with_capacity(HEADER_LEN);
        write_header(&mut header, stored_channels, sample_rate, 0);

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&header)?;

        Ok(WavEncoder {
            writer: Some(writer),
            sample_rate,
            channel_count,
            frames_written: 0,
        })
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of frames written
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    fn finish(&mut self) -> AudioResult<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };

        let data_len = data_len(self.frames_written, self.channel_count)?;
        let mut file = writer.into_inner().map_err(|e| e.into_error())?;

        file.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
        file.write_all(&(36 + data_len).to_le_bytes())?;
        file.seek(SeekFrom::Start(DATA_SIZE_OFFSET))?;
        file.write_all(&data_len.to_le_bytes())?;
        file.flush()?;

        Ok(())
    }
}

impl super::Encoder for WavEncoder {
    fn encode(&mut self, buffer: &SampleBuffer) -> AudioResult<()> {
        if buffer.sample_rate() != self.sample_rate {
            return Err(AudioError::InvalidSampleRate {
                rate: buffer.sample_rate(),
            });
        }

        if buffer.channel_count() != self.channel_count {
            return Err(AudioError::EncodeError(format!(
                "expected {} channels, got {}",
                self.channel_count,
                buffer.channel_count()
            )));
        }

        let frames = self.frames_written + buffer.frame_count();
        data_len(frames, self.channel_count)?;

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| AudioError::EncodeError("Encoder already finalized".to_string()))?;
        write_samples(writer, buffer)?;

        self.frames_written = frames;
        Ok(())
    }

    fn finalize(&mut self) -> AudioResult<()> {
        self.finish()
    }
}

impl Drop for WavEncoder {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            warn!("failed to finalize WAV file: {}", err);
        }
    }
}
