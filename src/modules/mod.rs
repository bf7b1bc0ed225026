//! User facing commands.
//! Each subcommand builds a [`Module`] from its arguments and the synthesis config.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::{
    audio::{devices, speaker::Speaker},
    coding::{dtmf, wav::DEFAULT_FILE_NAME, KeypadSymbol},
    config::SynthConfig,
};

pub mod dial;
pub mod generate;
pub mod play;

pub trait Module {
    fn name(&self) -> &'static str;
    fn run(&self) -> Result<()>;
}

pub struct InitContext {
    pub args: ArgMatches,
    pub config: SynthConfig,
}

impl InitContext {
    /// The validated `digits` argument.
    pub fn digits(&self) -> Result<Vec<KeypadSymbol>> {
        let raw = self
            .args
            .get_one::<String>("digits")
            .context("No digits given")?;
        Ok(dtmf::parse_symbols(raw)?)
    }

    /// Where generated files are written.
    pub fn output_path(&self) -> PathBuf {
        self.args
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
    }

    /// Opens the output device picked with `--output-device`.
    pub fn speaker(&self) -> Result<Speaker> {
        let name = self
            .args
            .get_one::<String>("output-device")
            .map(String::as_str)
            .unwrap_or("default");
        Speaker::new(devices::output_device(name)?)
    }
}
