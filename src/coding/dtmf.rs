use std::{fmt, vec};

use crate::{
    audio::tone::Tone,
    config::{SynthConfig, MAX_SAMPLES},
    error::DtmfError,
};

// https://en.wikipedia.org/wiki/Dual-tone_multi-frequency_signaling

const ROW: [f64; 4] = [697.0, 770.0, 852.0, 941.0];
const COL: [f64; 3] = [1209.0, 1336.0, 1477.0];
const VAL: [u8; 12] = *b"123456789*0#";

/// One key of a standard telephone keypad.
/// Variants are in keypad layout order, so `symbol as usize` indexes the key table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadSymbol {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Star,
    Zero,
    Pound,
}

impl KeypadSymbol {
    pub const ALL: [KeypadSymbol; 12] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Star,
        Self::Zero,
        Self::Pound,
    ];

    pub fn from_char(chr: char) -> Option<Self> {
        VAL.iter()
            .position(|&x| x as char == chr)
            .map(|i| Self::ALL[i])
    }

    pub fn as_char(self) -> char {
        VAL[self as usize] as char
    }

    /// The (row, column) frequencies of the key in Hz.
    pub fn frequencies(self) -> (f64, f64) {
        let i = self as usize;
        (ROW[i / COL.len()], COL[i % COL.len()])
    }
}

impl fmt::Display for KeypadSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Converts a dial string into keypad symbols.
/// The whole string is checked before anything is returned.
pub fn parse_symbols(input: &str) -> Result<Vec<KeypadSymbol>, DtmfError> {
    input
        .chars()
        .enumerate()
        .map(|(position, symbol)| {
            KeypadSymbol::from_char(symbol).ok_or(DtmfError::InvalidSymbol { symbol, position })
        })
        .collect()
}

pub fn symbols_to_string(symbols: &[KeypadSymbol]) -> String {
    symbols.iter().map(|x| x.as_char()).collect()
}

/// Streams the DTMF signal for a sequence of keys.
/// Each key is a tone burst of `signal_samples` followed by `silence_samples` of silence,
/// including the last key.
pub struct DtmfEncoder {
    // == Config ==
    sample_rate: u32,
    signal: usize,
    silence: usize,

    // == Internal ==
    data: vec::IntoIter<KeypadSymbol>,
    low: Tone,
    high: Tone,
    cooldown: usize,
    remaining: usize,
}

impl DtmfEncoder {
    pub fn new(data: &[KeypadSymbol], config: &SynthConfig) -> Self {
        let signal = config.signal_samples();
        let silence = config.silence_samples();

        Self {
            sample_rate: config.sample_rate,
            signal,
            silence,

            data: data.to_vec().into_iter(),
            low: Tone::new(0.0, config.sample_rate).duration(0),
            high: Tone::new(0.0, config.sample_rate).duration(0),
            cooldown: 0,
            remaining: data.len().saturating_mul(config.samples_per_symbol()),
        }
    }
}

impl Iterator for DtmfEncoder {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let (Some(low), Some(high)) = (self.low.next(), self.high.next()) {
                self.remaining -= 1;
                return Some(((low + high) * 0.5) as f32);
            }

            if self.cooldown > 0 {
                self.cooldown -= 1;
                self.remaining -= 1;
                return Some(0.0);
            }

            let (low, high) = self.data.next()?.frequencies();
            self.low = Tone::new(low, self.sample_rate).duration(self.signal);
            self.high = Tone::new(high, self.sample_rate).duration(self.signal);
            self.cooldown = self.silence;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for DtmfEncoder {}

/// Renders the full signal for `symbols`.
pub fn synthesize(
    symbols: &[KeypadSymbol],
    config: &SynthConfig,
) -> Result<Vec<f32>, DtmfError> {
    config.validate()?;

    let len = symbols
        .len()
        .checked_mul(config.samples_per_symbol())
        .filter(|&x| x <= MAX_SAMPLES)
        .ok_or_else(|| {
            DtmfError::invalid_format(format!(
                "{} symbols exceed the limit of {MAX_SAMPLES} samples",
                symbols.len()
            ))
        })?;

    let samples = DtmfEncoder::new(symbols, config).collect::<Vec<_>>();
    debug_assert_eq!(samples.len(), len);
    Ok(samples)
}

#[cfg(test)]
mod test {
    use std::f64::consts::PI;

    use hashbrown::HashSet;

    use super::{parse_symbols, synthesize, DtmfEncoder, KeypadSymbol, COL, ROW};
    use crate::{config::SynthConfig, error::DtmfError};

    // https://en.wikipedia.org/wiki/Goertzel_algorithm
    fn goertzel_mag(freq: f64, samples: &[f32], sample_rate: u32) -> f64 {
        let k = (0.5 + (samples.len() as f64 * freq) / sample_rate as f64).floor();
        let omega = (2.0 * PI * k) / samples.len() as f64;
        let sin = omega.sin();
        let cos = omega.cos();
        let coeff = cos * 2.0;

        let mut q0;
        let mut q1 = 0.0;
        let mut q2 = 0.0;

        for &i in samples {
            q0 = coeff * q1 - q2 + i as f64;
            q2 = q1;
            q1 = q0;
        }

        let real = q1 - q2 * cos;
        let imag = q2 * sin;

        (real.powi(2) + imag.powi(2)).sqrt()
    }

    fn synthesize_str(input: &str, config: &SynthConfig) -> Result<Vec<f32>, DtmfError> {
        synthesize(&parse_symbols(input)?, config)
    }

    fn strongest(freqs: &[f64], samples: &[f32], sample_rate: u32) -> f64 {
        *freqs
            .iter()
            .max_by(|a, b| {
                goertzel_mag(**a, samples, sample_rate)
                    .total_cmp(&goertzel_mag(**b, samples, sample_rate))
            })
            .unwrap()
    }

    #[test]
    fn test_frequency_table() {
        let expected = [
            ('1', 697.0, 1209.0),
            ('2', 697.0, 1336.0),
            ('3', 697.0, 1477.0),
            ('4', 770.0, 1209.0),
            ('5', 770.0, 1336.0),
            ('6', 770.0, 1477.0),
            ('7', 852.0, 1209.0),
            ('8', 852.0, 1336.0),
            ('9', 852.0, 1477.0),
            ('*', 941.0, 1209.0),
            ('0', 941.0, 1336.0),
            ('#', 941.0, 1477.0),
        ];

        for (chr, low, high) in expected {
            let symbol = KeypadSymbol::from_char(chr).unwrap();
            assert_eq!(symbol.as_char(), chr);
            assert_eq!(symbol.frequencies(), (low, high), "key {chr}");
        }

        let pairs = KeypadSymbol::ALL
            .iter()
            .map(|x| {
                let (low, high) = x.frequencies();
                (low as u32, high as u32)
            })
            .collect::<HashSet<_>>();
        assert_eq!(pairs.len(), 12);
    }

    #[test]
    fn test_unknown_symbols() {
        for chr in ['A', 'D', 'a', ' ', '-', '+', 'é'] {
            assert_eq!(KeypadSymbol::from_char(chr), None);
        }

        assert_eq!(
            parse_symbols("12A4"),
            Err(DtmfError::InvalidSymbol {
                symbol: 'A',
                position: 2
            })
        );
        assert_eq!(parse_symbols(""), Ok(Vec::new()));
        assert_eq!(
            parse_symbols("*0#").unwrap(),
            vec![KeypadSymbol::Star, KeypadSymbol::Zero, KeypadSymbol::Pound]
        );
    }

    #[test]
    fn test_invalid_symbol_aborts() {
        let err = synthesize_str("555A", &SynthConfig::default()).unwrap_err();
        assert!(matches!(err, DtmfError::InvalidSymbol { symbol: 'A', .. }));
    }

    #[test]
    fn test_empty_input() {
        let samples = synthesize(&[], &SynthConfig::default()).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let config = SynthConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(matches!(
            synthesize_str("1", &config),
            Err(DtmfError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_oversized_signal_rejected() {
        let config = SynthConfig {
            tone_duration: 1e300,
            ..Default::default()
        };
        assert!(matches!(
            synthesize(&[KeypadSymbol::One], &config),
            Err(DtmfError::InvalidFormat(_))
        ));

        // Each symbol fits on its own, together they do not
        let config = SynthConfig {
            sample_rate: 1000,
            tone_duration: 2_000_000.0,
            silence_duration: 0.0,
        };
        assert!(config.validate().is_ok());
        assert!(matches!(
            synthesize(&[KeypadSymbol::One, KeypadSymbol::Two], &config),
            Err(DtmfError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_single_symbol_samples() {
        let config = SynthConfig::default();
        let samples = synthesize_str("5", &config).unwrap();
        assert_eq!(samples.len(), 4410);

        for (j, &sample) in samples[..2205].iter().enumerate() {
            let t = j as f64 / 44100.0;
            let expected = 0.5 * ((2.0 * PI * 770.0 * t).sin() + (2.0 * PI * 1336.0 * t).sin());
            assert!((sample as f64 - expected).abs() < 1e-6, "sample {j}");
        }

        assert!(samples[2205..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_length_law() {
        let config = SynthConfig {
            sample_rate: 8000,
            tone_duration: 0.04,
            silence_duration: 0.02,
        };
        let encoder = DtmfEncoder::new(&parse_symbols("0123456789*#").unwrap(), &config);
        assert_eq!(encoder.len(), 12 * (320 + 160));
        assert_eq!(encoder.count(), 12 * (320 + 160));
    }

    #[test]
    fn test_trailing_silence() {
        let config = SynthConfig {
            sample_rate: 8000,
            tone_duration: 0.01,
            silence_duration: 0.01,
        };
        let samples = synthesize_str("12", &config).unwrap();
        assert_eq!(samples.len(), 320);
        assert!(samples[80..160].iter().all(|&x| x == 0.0));
        assert!(samples[240..].iter().all(|&x| x == 0.0));
        assert!(samples[160..240].iter().any(|&x| x != 0.0));
    }

    #[test]
    fn test_no_silence() {
        let config = SynthConfig {
            silence_duration: 0.0,
            ..Default::default()
        };
        let samples = synthesize_str("11", &config).unwrap();
        assert_eq!(samples.len(), 2 * 2205);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[2205], 0.0);
        assert_eq!(samples[..2205], samples[2205..]);
    }

    #[test]
    fn test_amplitude_bounds() {
        let samples = synthesize_str("147*2580369#", &SynthConfig::default()).unwrap();
        assert!(samples.iter().all(|x| (-1.0..=1.0).contains(x)));
    }

    #[test]
    fn test_tones_detectable() {
        let config = SynthConfig::default();
        let block = config.samples_per_symbol();
        let signal = config.signal_samples();
        let samples = synthesize(&KeypadSymbol::ALL, &config).unwrap();

        for (i, symbol) in KeypadSymbol::ALL.iter().enumerate() {
            let burst = &samples[i * block..i * block + signal];
            let (low, high) = symbol.frequencies();
            assert_eq!(strongest(&ROW, burst, config.sample_rate), low, "key {symbol}");
            assert_eq!(strongest(&COL, burst, config.sample_rate), high, "key {symbol}");
        }
    }

    #[test]
    fn test_deterministic() {
        let config = SynthConfig::default();
        assert_eq!(
            synthesize_str("8675309", &config).unwrap(),
            synthesize_str("8675309", &config).unwrap()
        );
    }
}
