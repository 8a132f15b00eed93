//! Tone synthesis and WAV container handling.
//!
//! This crate generates the stereo 16-bit tones that get embedded in
//! firmware, writes them as WAV files, and parses WAV images the same way
//! the firmware's packet reader does.

pub mod container;
pub mod job;
pub mod notes;
pub mod tone;

pub use container::{ContainerError, ToneReport, WavInfo, WavParseError, write_tone};
pub use job::{Job, JobError, ToneEntry};
pub use notes::{Note, Pitch};
pub use tone::{Quantization, ToneConfig, ToneError, synthesize};
