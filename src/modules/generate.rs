//! Writes the DTMF signal for a number to a WAV file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::{
    coding::{self, dtmf, wav::MIME_TYPE, KeypadSymbol},
    config::SynthConfig,
};

use super::{InitContext, Module};

pub struct Generate {
    ctx: InitContext,
    symbols: Vec<KeypadSymbol>,
    output: PathBuf,
}

impl Generate {
    pub fn new(ctx: InitContext) -> Result<Self> {
        Ok(Self {
            symbols: ctx.digits()?,
            output: ctx.output_path(),
            ctx,
        })
    }
}

impl Module for Generate {
    fn name(&self) -> &'static str {
        "Generate"
    }

    fn run(&self) -> Result<()> {
        let size = save(&self.output, &self.symbols, &self.ctx.config)?;
        println!(
            "[*] Wrote `{}` ({} keys, {size} bytes) to `{}`",
            dtmf::symbols_to_string(&self.symbols),
            self.symbols.len(),
            self.output.display()
        );
        Ok(())
    }
}

/// Encodes the keys and writes the container to `path`, returning its size in bytes.
/// Nothing is written if encoding fails.
pub fn save(path: &Path, symbols: &[KeypadSymbol], config: &SynthConfig) -> Result<usize> {
    let wav = coding::symbols_to_wav(symbols, config)?;
    debug!(
        bytes = wav.len(),
        sample_rate = config.sample_rate,
        "Encoded {MIME_TYPE} container"
    );

    fs::write(path, &wav).with_context(|| format!("Failed to write `{}`", path.display()))?;
    Ok(wav.len())
}
