//! C byte-array headers for embedding binary files in firmware.
//!
//! Turns any byte sequence into a `const uint8_t` array literal and a
//! matching `const uint32_t` length constant.

pub mod encode;
pub mod naming;

pub use encode::{encode_c_array, encode_file, write_header};
pub use naming::{ArrayNames, frequency_tag, sanitize_identifier};

/// Errors that can occur while producing a header
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("Not a valid C identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Bytes per line must be at least 1")]
    ZeroBytesPerLine,

    #[error("Input too large for a uint32_t length: {0} bytes")]
    TooLarge(usize),

    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),

    #[error(transparent)]
    Core(#[from] wavembed_core::Error),
}
