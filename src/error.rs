//! Errors produced by the synthesis and encoding core.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DtmfError {
    /// A character outside of the 12 key telephone keypad.
    #[error("invalid keypad symbol `{symbol}` at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    /// Synthesis or container parameters that can not be encoded.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

impl DtmfError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat(message.into())
    }
}
