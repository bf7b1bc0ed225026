//! Playback through a cpal output stream.

use std::{
    sync::{mpsc, Arc},
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{Context, Result};
use cpal::{
    traits::{DeviceTrait, StreamTrait},
    Device, SupportedStreamConfig,
};
use tracing::debug;

use crate::{
    audio::tone::Tone,
    coding::KeypadSymbol,
    config::{PREVIEW_DURATION, PREVIEW_GAIN},
};

pub struct Speaker {
    device: Arc<Device>,
    config: SupportedStreamConfig,
}

impl Speaker {
    pub fn new(device: Device) -> Result<Self> {
        let config = device
            .default_output_config()
            .context("No default output config")?;

        debug!(
            "Output hooked into `{}` ({} Hz, {} channels)",
            device.name().unwrap_or_default(),
            config.sample_rate().0,
            config.channels()
        );

        Ok(Self {
            device: Arc::new(device),
            config,
        })
    }

    pub fn name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "unknown device".to_owned())
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    /// Plays `source` on every channel, blocking for `duration`.
    /// Once the source runs dry the rest of the time is silence.
    pub fn play<I>(&self, source: I, duration: Duration) -> Result<()>
    where
        I: Iterator<Item = f32> + Send + 'static,
    {
        play(&self.device, &self.config, source, duration)
    }

    /// Plays the tone of a key for [`PREVIEW_DURATION`] on a background thread.
    /// The caller is never blocked, failures come back through the handle.
    pub fn preview(&self, symbol: KeypadSymbol) -> JoinHandle<Result<()>> {
        let device = self.device.clone();
        let config = self.config.clone();
        let sample_rate = self.sample_rate();

        thread::spawn(move || {
            let (low, high) = symbol.frequencies();
            let tone = Tone::new(low, sample_rate)
                .zip(Tone::new(high, sample_rate))
                .map(|(low, high)| ((low + high) * 0.5) as f32 * PREVIEW_GAIN);

            play(&device, &config, tone, PREVIEW_DURATION)
                .with_context(|| format!("Preview of `{symbol}` failed"))
        })
    }
}

fn play<I>(
    device: &Device,
    config: &SupportedStreamConfig,
    mut source: I,
    duration: Duration,
) -> Result<()>
where
    I: Iterator<Item = f32> + Send + 'static,
{
    let channels = config.channels() as usize;
    let (errors, stream_errors) = mpsc::channel();
    let stream = device
        .build_output_stream(
            &config.config(),
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                // Same sample on every channel of the frame
                let mut last = 0.0;
                for (i, e) in data.iter_mut().enumerate() {
                    if i % channels == 0 {
                        last = source.next().unwrap_or(0.0);
                    }

                    *e = last;
                }
            },
            move |err| {
                let _ = errors.send(err);
            },
            None,
        )
        .context("Failed to build output stream")?;

    stream.play().context("Failed to start output stream")?;
    thread::sleep(duration);
    drop(stream);

    match stream_errors.try_recv() {
        Ok(err) => Err(err).context("Output stream error"),
        Err(_) => Ok(()),
    }
}
