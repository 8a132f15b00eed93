//! Batch job file format.
//!
//! A job lists several tones to render in one run, sharing sample rate,
//! duration, and amplitude. Stored as RON so it sits comfortably next to
//! firmware sources under version control.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use wavembed_core::{DEFAULT_BYTES_PER_LINE, SampleRate, sample_rates};

use crate::notes::Pitch;
use crate::tone::{Quantization, ToneConfig};

/// Current job file format version
pub const JOB_VERSION: u32 = 1;

/// A tone to render, by frequency or by note name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToneEntry {
    /// Frequency in Hz
    Frequency(f64),

    /// Note name such as `"B4"` or `"C#4"`
    Note(String),
}

impl ToneEntry {
    /// Resolve to a frequency in Hz
    pub fn frequency(&self) -> Result<f64, JobError> {
        match self {
            Self::Frequency(hz) => Ok(*hz),
            Self::Note(name) => {
                let pitch: Pitch = name
                    .parse()
                    .map_err(|e| JobError::InvalidData(format!("{name}: {e}")))?;
                pitch.frequency().ok_or_else(|| {
                    JobError::InvalidData(format!("No table entry for note {pitch}"))
                })
            }
        }
    }
}

/// Top-level job structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Format version for future compatibility
    pub version: u32,

    /// Directory the WAV and header files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Sample rate (Hz)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: SampleRate,

    /// Duration of every tone (seconds)
    #[serde(default = "default_duration")]
    pub duration_secs: f64,

    /// Amplitude as a fraction of full scale
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,

    #[serde(default)]
    pub quantization: Quantization,

    /// Hex entries per line in the generated headers
    #[serde(default = "default_bytes_per_line")]
    pub bytes_per_line: usize,

    /// Tones to render
    pub tones: Vec<ToneEntry>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_sample_rate() -> SampleRate {
    sample_rates::SR_48000
}

fn default_duration() -> f64 {
    ToneConfig::default().duration_secs
}

fn default_amplitude() -> f64 {
    ToneConfig::default().amplitude
}

fn default_bytes_per_line() -> usize {
    DEFAULT_BYTES_PER_LINE
}

impl Job {
    /// Create a job with default settings and no tones
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            version: JOB_VERSION,
            output_dir: output_dir.into(),
            sample_rate: default_sample_rate(),
            duration_secs: default_duration(),
            amplitude: default_amplitude(),
            quantization: Quantization::default(),
            bytes_per_line: default_bytes_per_line(),
            tones: Vec::new(),
        }
    }

    /// Save job to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), JobError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| JobError::SerializationFailed(e.to_string()))?;

        wavembed_core::fs::write_atomic(path, ron_string.as_bytes())?;

        Ok(())
    }

    /// Load job from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, JobError> {
        let bytes = wavembed_core::fs::read(path)?;
        let ron_string = String::from_utf8(bytes)
            .map_err(|e| JobError::DeserializationFailed(e.to_string()))?;

        let job: Self = ron::from_str(&ron_string)
            .map_err(|e| JobError::DeserializationFailed(e.to_string()))?;

        // Validate version
        if job.version > JOB_VERSION {
            return Err(JobError::UnsupportedVersion(job.version));
        }

        Ok(job)
    }

    /// Build and validate a tone config for every entry
    ///
    /// Entries resolving to a frequency already listed (e.g. `A#4` and
    /// `Bb4`) would write the same files, so only the first is kept.
    pub fn tone_configs(&self) -> Result<Vec<ToneConfig>, JobError> {
        let mut seen = HashSet::new();
        let mut configs = Vec::with_capacity(self.tones.len());

        for entry in &self.tones {
            let config = ToneConfig {
                sample_rate: self.sample_rate,
                duration_secs: self.duration_secs,
                frequency: entry.frequency()?,
                amplitude: self.amplitude,
                quantization: self.quantization,
            };
            config
                .validate()
                .map_err(|e| JobError::InvalidData(format!("{entry:?}: {e}")))?;

            if !seen.insert(config.frequency.to_bits()) {
                tracing::warn!(
                    "Skipping {:?}: {} Hz is already in the job",
                    entry,
                    config.frequency
                );
                continue;
            }
            configs.push(config);
        }

        Ok(configs)
    }
}

/// Errors that can occur during job operations
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Core(#[from] wavembed_core::Error),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported job version: {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid job data: {0}")]
    InvalidData(String),
}
