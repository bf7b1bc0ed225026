//! Plays the DTMF signal for a number on the output device.

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::{
    coding::{dtmf, DtmfEncoder, KeypadSymbol},
    config::SynthConfig,
};

use super::{InitContext, Module};

/// Extra time the stream is kept open so the device buffer can drain.
const STREAM_TAIL: Duration = Duration::from_millis(100);

pub struct Play {
    ctx: InitContext,
    symbols: Vec<KeypadSymbol>,
}

impl Play {
    pub fn new(ctx: InitContext) -> Result<Self> {
        Ok(Self {
            symbols: ctx.digits()?,
            ctx,
        })
    }
}

impl Module for Play {
    fn name(&self) -> &'static str {
        "Play"
    }

    fn run(&self) -> Result<()> {
        let speaker = self.ctx.speaker()?;
        let config = device_config(&self.ctx.config, speaker.sample_rate());
        config.validate()?;

        let encoder = DtmfEncoder::new(&self.symbols, &config);
        let duration = signal_duration(encoder.len(), config.sample_rate);

        println!(
            "[*] Playing `{}` on `{}` ({:.2}s)",
            dtmf::symbols_to_string(&self.symbols),
            speaker.name(),
            duration.as_secs_f64()
        );
        speaker.play(encoder, duration + STREAM_TAIL)
    }
}

/// The config with its sample rate swapped for the device's.
/// The signal is synthesized at the rate the device plays so no resampling is needed.
fn device_config(config: &SynthConfig, device_rate: u32) -> SynthConfig {
    if config.sample_rate != device_rate {
        info!(
            "Synthesizing at the device rate of {device_rate} Hz instead of {} Hz",
            config.sample_rate
        );
    }

    SynthConfig {
        sample_rate: device_rate,
        ..*config
    }
}

fn signal_duration(samples: usize, sample_rate: u32) -> Duration {
    Duration::from_secs_f64(samples as f64 / sample_rate as f64)
}
