//! Picks the output device used for playback and key previews.

use anyhow::{Context, Result};
use cpal::{
    traits::{DeviceTrait, HostTrait},
    Device,
};
use tracing::debug;

use crate::misc::Similarity;

/// Finds an output device by name.
/// `default` picks the host's default device, anything else picks the device with the
/// highest string similarity (dice coefficient) to the given name.
pub fn output_device(wanted: &str) -> Result<Device> {
    let host = cpal::default_host();
    let wanted = wanted.to_lowercase();

    if wanted == "default" {
        return host
            .default_output_device()
            .context("No default output device");
    }

    let (score, device) = host
        .output_devices()
        .context("Failed to list output devices")?
        .filter_map(|x| {
            let name = x.name().ok()?.to_lowercase();
            Some((name.similarity(&wanted), x))
        })
        .reduce(|a, b| if a.0 > b.0 { a } else { b })
        .context("No output device found")?;

    debug!(score, "Matched output device for `{wanted}`");
    Ok(device)
}
