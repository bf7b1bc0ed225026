//! Audio utilities.
//! Tone generation and playback through the system output device.

pub mod devices;
pub mod speaker;
pub mod tone;
