//! Uncompressed PCM container (RIFF / WAVE) encoding.
//! Output holds no timestamps or other variable metadata, so equal samples always give equal bytes.

use crate::error::DtmfError;

pub const MIME_TYPE: &str = "audio/wav";
pub const DEFAULT_FILE_NAME: &str = "dtmf.wav";
/// Size of the RIFF + fmt + data chunk headers.
pub const HEADER_SIZE: usize = 44;

const PCM_FORMAT: u16 = 1;
const FMT_CHUNK_SIZE: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// 16 bit mono PCM, the only layout the encoder writes.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    /// Bytes per sample frame across all channels.
    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    pub fn validate(&self) -> Result<(), DtmfError> {
        if self.sample_rate == 0 {
            return Err(DtmfError::invalid_format("sample rate must be positive"));
        }

        if self.channels != 1 || self.bits_per_sample != 16 {
            return Err(DtmfError::invalid_format(format!(
                "unsupported layout: {} channel(s) at {} bits, only 16 bit mono is supported",
                self.channels, self.bits_per_sample
            )));
        }

        if self.sample_rate.checked_mul(self.block_align() as u32).is_none() {
            return Err(DtmfError::invalid_format(format!(
                "byte rate of {} Hz overflows",
                self.sample_rate
            )));
        }

        Ok(())
    }
}

/// Converts a normalized sample to signed 16 bit PCM.
/// Negative values scale by 32768 and positive ones by 32767 so both ends of the range are reachable.
pub fn quantize(sample: f32) -> i16 {
    let sample = (sample as f64).clamp(-1.0, 1.0);
    let scaled = if sample < 0.0 {
        sample * 32768.0
    } else {
        sample * 32767.0
    };

    // NaN casts to 0
    scaled.round() as i16
}

/// Builds a complete container holding `samples`.
pub fn encode_wav(samples: &[f32], format: &WavFormat) -> Result<Vec<u8>, DtmfError> {
    format.validate()?;

    let data_size = samples
        .len()
        .checked_mul(format.block_align() as usize)
        .and_then(|x| u32::try_from(x).ok())
        .filter(|x| x.checked_add(HEADER_SIZE as u32 - 8).is_some())
        .ok_or_else(|| {
            DtmfError::invalid_format(format!(
                "{} samples do not fit in a RIFF container",
                samples.len()
            ))
        })?;

    let mut out = Vec::with_capacity(HEADER_SIZE + data_size as usize);

    // RIFF header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(HEADER_SIZE as u32 - 8 + data_size).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
    out.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    out.extend_from_slice(&format.channels.to_le_bytes());
    out.extend_from_slice(&format.sample_rate.to_le_bytes());
    out.extend_from_slice(&format.byte_rate().to_le_bytes());
    out.extend_from_slice(&format.block_align().to_le_bytes());
    out.extend_from_slice(&format.bits_per_sample.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        out.extend_from_slice(&quantize(sample).to_le_bytes());
    }

    debug_assert_eq!(out.len(), HEADER_SIZE + data_size as usize);
    Ok(out)
}
