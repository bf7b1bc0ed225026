//! Synthesis parameters.
//! Defaults match the classic dialer output: 44.1kHz, 50ms tones with 50ms gaps.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{coding::wav::WavFormat, error::DtmfError};

/// How long a key press preview plays for.
pub const PREVIEW_DURATION: Duration = Duration::from_millis(400);
/// Gain applied to the key press preview.
pub const PREVIEW_GAIN: f32 = 0.1;
/// Most samples a signal may hold.
/// Past this, 16 bit samples no longer fit the u32 size fields of the container.
pub const MAX_SAMPLES: usize = u32::MAX as usize / 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    /// Samples per second of the generated signal.
    pub sample_rate: u32,
    /// Length of each tone burst in seconds.
    pub tone_duration: f64,
    /// Length of the silence after each tone burst in seconds.
    pub silence_duration: f64,
}

impl SynthConfig {
    pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
    pub const DEFAULT_TONE_DURATION: f64 = 0.05;
    pub const DEFAULT_SILENCE_DURATION: f64 = 0.05;

    /// Loads a config from a JSON file.
    /// Fields missing from the file keep their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config `{}`", path.display()))?;
        let config = serde_json::from_str::<Self>(&raw)
            .with_context(|| format!("Failed to parse config `{}`", path.display()))?;
        Ok(config)
    }

    /// Number of samples in one tone burst.
    pub fn signal_samples(&self) -> usize {
        (self.sample_rate as f64 * self.tone_duration).round() as usize
    }

    /// Number of zero samples after each tone burst.
    pub fn silence_samples(&self) -> usize {
        (self.sample_rate as f64 * self.silence_duration).round() as usize
    }

    /// Samples produced for every symbol (tone + silence).
    pub fn samples_per_symbol(&self) -> usize {
        self.signal_samples().saturating_add(self.silence_samples())
    }

    /// Container format for signals made with this config.
    pub fn format(&self) -> WavFormat {
        WavFormat::mono(self.sample_rate)
    }

    pub fn validate(&self) -> Result<(), DtmfError> {
        if self.sample_rate == 0 {
            return Err(DtmfError::invalid_format("sample rate must be positive"));
        }

        if !self.tone_duration.is_finite() || self.tone_duration <= 0.0 {
            return Err(DtmfError::invalid_format(format!(
                "tone duration must be positive, got {}",
                self.tone_duration
            )));
        }

        if !self.silence_duration.is_finite() || self.silence_duration < 0.0 {
            return Err(DtmfError::invalid_format(format!(
                "silence duration must not be negative, got {}",
                self.silence_duration
            )));
        }

        // Summed as floats, the usize counts saturate for huge durations
        let rate = self.sample_rate as f64;
        let samples =
            (rate * self.tone_duration).round() + (rate * self.silence_duration).round();
        if samples > MAX_SAMPLES as f64 {
            return Err(DtmfError::invalid_format(format!(
                "{samples} samples per symbol exceed the limit of {MAX_SAMPLES}"
            )));
        }

        Ok(())
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            tone_duration: Self::DEFAULT_TONE_DURATION,
            silence_duration: Self::DEFAULT_SILENCE_DURATION,
        }
    }
}
