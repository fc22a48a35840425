//! WAV container encoding for synthesized speech

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::SpeechError;
use crate::types::PcmAudio;

/// Channel count of every synthesized file
pub const CHANNELS: u16 = 1;

/// Bit depth of every synthesized file
pub const BITS_PER_SAMPLE: u16 = 16;

/// Wrap signed 16-bit little-endian mono PCM in a WAV container
///
/// # Errors
///
/// Returns `SpeechError::MalformedResponse` for an odd byte count (a
/// truncated sample) and `SpeechError::AudioProcessing` if encoding fails.
pub fn pcm_to_wav(pcm: &PcmAudio) -> Result<Vec<u8>, SpeechError> {
    if pcm.data.len() % 2 != 0 {
        return Err(SpeechError::MalformedResponse(format!(
            "PCM stream has an odd length of {} bytes",
            pcm.data.len()
        )));
    }
    if pcm.sample_rate == 0 {
        return Err(SpeechError::AudioProcessing(
            "Sample rate must be greater than 0".to_string(),
        ));
    }

    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate: pcm.sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(pcm.data.len() + 44));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for chunk in pcm.data.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}
