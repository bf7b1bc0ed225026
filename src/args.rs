use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{value_parser, Arg, ArgMatches, Command};

use crate::{
    coding::wav::DEFAULT_FILE_NAME,
    config::SynthConfig,
    modules::{dial::Dial, generate::Generate, play::Play, InitContext, Module},
};

pub fn command() -> Command {
    let digits = Arg::new("digits")
        .required(true)
        .help("Keys to dial, any of 0-9 * #");
    let output = Arg::new("output")
        .short('o')
        .long("output")
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_FILE_NAME)
        .help("File the WAV container is written to");

    Command::new("dtmf-dialer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turns dialed numbers into DTMF tones and WAV files.")
        .subcommand_required(true)
        .args([
            Arg::new("config")
                .short('c')
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON file with synthesis settings"),
            Arg::new("sample-rate")
                .short('r')
                .long("sample-rate")
                .global(true)
                .value_parser(value_parser!(u32))
                .help("Samples per second [default: 44100]"),
            Arg::new("tone-duration")
                .long("tone-duration")
                .global(true)
                .value_parser(value_parser!(f64))
                .help("Seconds each key tone lasts [default: 0.05]"),
            Arg::new("silence-duration")
                .long("silence-duration")
                .global(true)
                .value_parser(value_parser!(f64))
                .help("Seconds of silence after each key [default: 0.05]"),
            Arg::new("output-device")
                .short('d')
                .long("output-device")
                .global(true)
                .default_value("default")
                .help("Output device used for playback, matched by name"),
        ])
        .subcommands([
            Command::new("generate")
                .alias("g")
                .about("Writes the tones for a number to a WAV file.")
                .args([digits.clone(), output.clone()]),
            Command::new("play")
                .alias("p")
                .about("Plays the tones for a number on the output device.")
                .arg(digits),
            Command::new("dial")
                .alias("d")
                .about("Interactive keypad, previews each key and saves on Enter.")
                .arg(output),
        ])
}

pub fn parse_args() -> Result<Box<dyn Module>> {
    module(&command().get_matches())
}

pub fn module(m: &ArgMatches) -> Result<Box<dyn Module>> {
    let config = synth_config(m)?;
    let ic = |x: &ArgMatches| InitContext {
        args: x.to_owned(),
        config,
    };

    Ok(match m.subcommand() {
        Some(("generate", m)) => Box::new(Generate::new(ic(m))?),
        Some(("play", m)) => Box::new(Play::new(ic(m))?),
        Some(("dial", m)) => Box::new(Dial::new(ic(m))?),
        _ => bail!("Invalid subcommand"),
    })
}

/// Builds the synthesis config from the config file (if any) and command line overrides.
pub fn synth_config(m: &ArgMatches) -> Result<SynthConfig> {
    let mut config = match m.get_one::<PathBuf>("config") {
        Some(path) => SynthConfig::load(path)?,
        None => SynthConfig::default(),
    };

    if let Some(&rate) = m.get_one::<u32>("sample-rate") {
        config.sample_rate = rate;
    }

    if let Some(&duration) = m.get_one::<f64>("tone-duration") {
        config.tone_duration = duration;
    }

    if let Some(&duration) = m.get_one::<f64>("silence-duration") {
        config.silence_duration = duration;
    }

    config.validate()?;
    Ok(config)
}
