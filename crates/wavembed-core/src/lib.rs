//! Core types, constants, and error handling shared across the wavembed crates.
//!
//! Everything here is format-level knowledge: what a frame of embedded
//! audio looks like and how output files get published.

pub mod fs;

use std::path::PathBuf;

/// Sample rate in Hz
pub type SampleRate = u32;

/// Number of audio frames (one sample per channel)
pub type Frames = usize;

/// Quantized PCM sample as stored in the container
pub type Sample = i16;

/// Number of audio channels
pub type ChannelCount = u16;

/// Common sample rates
pub mod sample_rates {
    use super::SampleRate;

    /// 44.1 kHz sample rate (CD quality)
    pub const SR_44100: SampleRate = 44100;
    /// 48 kHz sample rate (I2S codec default on the target boards)
    pub const SR_48000: SampleRate = 48000;
}

/// Fixed container layout for embedded tones
pub mod layout {
    use super::ChannelCount;

    /// Mono source duplicated to left and right
    pub const CHANNELS: ChannelCount = 2;
    /// Bits per sample
    pub const BITS_PER_SAMPLE: u16 = 16;
    /// Bytes per frame (2 channels x 2 bytes)
    pub const BYTES_PER_FRAME: usize = 4;
    /// RIFF + `fmt ` (PCM, 16 bytes) + `data` chunk headers
    pub const CANONICAL_HEADER_LEN: usize = 44;
    /// Largest value a full-scale sample is scaled by
    pub const FULL_SCALE: f64 = 32767.0;
}

/// Hex entries per line in emitted C arrays
pub const DEFAULT_BYTES_PER_LINE: usize = 12;

/// Common error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error tied to the file it happened on
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
