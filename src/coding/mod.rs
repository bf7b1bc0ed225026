//! The deterministic core: keypad symbols to samples to container bytes.

pub mod dtmf;
pub mod wav;

use crate::{config::SynthConfig, error::DtmfError};

pub use dtmf::{DtmfEncoder, KeypadSymbol};

/// Renders the keys as a complete WAV file.
pub fn symbols_to_wav(
    symbols: &[KeypadSymbol],
    config: &SynthConfig,
) -> Result<Vec<u8>, DtmfError> {
    let samples = dtmf::synthesize(symbols, config)?;
    wav::encode_wav(&samples, &config.format())
}

#[cfg(test)]
mod test {
    use super::{dtmf::parse_symbols, symbols_to_wav};
    use crate::{config::SynthConfig, error::DtmfError};

    fn dial_to_wav(input: &str, config: &SynthConfig) -> Result<Vec<u8>, DtmfError> {
        symbols_to_wav(&parse_symbols(input)?, config)
    }

    #[test]
    fn test_empty_dial() {
        let wav = dial_to_wav("", &SynthConfig::default()).unwrap();
        assert_eq!(wav.len(), 44);
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 0);
        assert_eq!(
            u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]),
            44100
        );
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 1);
        assert_eq!(u16::from_le_bytes([wav[34], wav[35]]), 16);
    }

    #[test]
    fn test_data_length_law() {
        let config = SynthConfig {
            sample_rate: 16000,
            tone_duration: 0.07,
            silence_duration: 0.03,
        };
        let wav = dial_to_wav("5551234", &config).unwrap();

        let data = 2 * 7 * (1120 + 480);
        assert_eq!(wav.len(), 44 + data);
        assert_eq!(
            u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]) as usize,
            data
        );
    }

    #[test]
    fn test_pipeline_deterministic() {
        let config = SynthConfig::default();
        assert_eq!(
            dial_to_wav("*67#1800", &config).unwrap(),
            dial_to_wav("*67#1800", &config).unwrap()
        );
    }

    #[test]
    fn test_silence_quantizes_to_zero() {
        let wav = dial_to_wav("9", &SynthConfig::default()).unwrap();
        let silence = &wav[44 + 2 * 2205..];
        assert_eq!(silence.len(), 2 * 2205);
        assert!(silence.iter().all(|&x| x == 0));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            dial_to_wav("12B", &SynthConfig::default()),
            Err(DtmfError::InvalidSymbol { symbol: 'B', position: 2 })
        ));

        let config = SynthConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(matches!(
            dial_to_wav("12", &config),
            Err(DtmfError::InvalidFormat(_))
        ));
    }
}
