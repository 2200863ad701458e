use crate::core::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer as PcmBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Symphonia-based audio decoder
pub struct SymphoniaDecoder {
    /// Container reader
    reader: Box<dyn FormatReader>,
    /// Codec state for the selected track
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
    /// Track being decoded
    track_id: u32,
    sample_rate: u32,
    channel_count: usize,
    /// Whether decoding is finished
    finished: bool,
}

impl SymphoniaDecoder {
    /// Create decoder from file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> AudioResult<Self> {
        let path = path.as_ref();
        let file = Box::new(File::open(path)?);
        let mss = MediaSourceStream::new(file, Default::default());

        // Probe the file to detect format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;

        let reader = probed.format;

        // Find the first audio track
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::InvalidMetadata("No audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = &track.codec_params;

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| AudioError::InvalidMetadata("Unknown sample rate".to_string()))?;

        let channel_count = codec_params
            .channels
            .map(|c| c.count())
            .ok_or_else(|| AudioError::InvalidMetadata("Unknown channel count".to_string()))?;

        let decoder = symphonia::default::get_codecs()
            .make(codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::DecodeError(e.to_string()))?;

        Ok(SymphoniaDecoder {
            reader,
            decoder,
            track_id,
            sample_rate,
            channel_count,
            finished: false,
        })
    }

    /// Get sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of channels
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }
}

impl super::Decoder for SymphoniaDecoder {
    fn decode_chunk(&mut self) -> AudioResult<Option<SampleBuffer>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    self.finished = true;
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            };

            // Only process packets from our audio track
            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                // Corrupt packet, skip it
                Err(SymphoniaError::DecodeError(msg)) => {
                    log::warn!("skipping undecodable packet: {}", msg);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if decoded.frames() == 0 {
                continue;
            }

            let spec = *decoded.spec();
            let mut pcm = PcmBuffer::<f32>::new(decoded.capacity() as u64, spec);
            pcm.copy_interleaved_ref(decoded);

            let chunk =
                SampleBuffer::from_interleaved(pcm.samples(), spec.channels.count(), spec.rate)?;
            return Ok(Some(chunk));
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
