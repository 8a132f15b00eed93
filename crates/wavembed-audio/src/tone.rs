//! Sine tone synthesis.
//!
//! Produces interleaved stereo 16-bit samples from a mono sine. Both
//! channels always carry the same value.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use wavembed_core::layout::{BYTES_PER_FRAME, CANONICAL_HEADER_LEN, CHANNELS, FULL_SCALE};
use wavembed_core::{Frames, Sample, SampleRate, sample_rates};

/// How a scaled floating-point value becomes an `i16`
///
/// Both modes saturate at the `i16` bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantization {
    /// Truncate toward zero. Matches the tones already shipped in firmware.
    #[default]
    Truncate,
    /// Round to the nearest integer, removing the small bias toward zero
    Round,
}

impl Quantization {
    /// Scale `value` (nominally in [-1.0, 1.0]) to full scale and quantize
    pub fn quantize(self, value: f64) -> Sample {
        let scaled = value * FULL_SCALE;
        match self {
            Self::Truncate => scaled as Sample,
            Self::Round => scaled.round() as Sample,
        }
    }
}

/// Parameters for a generated tone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneConfig {
    /// Sample rate (Hz)
    pub sample_rate: SampleRate,

    /// Duration (seconds)
    pub duration_secs: f64,

    /// Frequency (Hz)
    pub frequency: f64,

    /// Amplitude as a fraction of full scale, in (0.0, 1.0]
    pub amplitude: f64,

    #[serde(default)]
    pub quantization: Quantization,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sample_rate: sample_rates::SR_48000,
            duration_secs: 0.5,
            // B4
            frequency: 494.0,
            amplitude: 0.1,
            quantization: Quantization::Truncate,
        }
    }
}

impl ToneConfig {
    /// Check the parameters before anything is synthesized or written
    pub fn validate(&self) -> Result<(), ToneError> {
        if self.sample_rate == 0 {
            return Err(ToneError::InvalidSampleRate);
        }
        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            return Err(ToneError::InvalidDuration(self.duration_secs));
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(ToneError::InvalidFrequency(self.frequency));
        }
        if !(self.amplitude > 0.0 && self.amplitude <= 1.0) {
            return Err(ToneError::InvalidAmplitude(self.amplitude));
        }

        // RIFF sizes are 32-bit; the whole file must stay addressable
        let max_frames = (u32::MAX as usize - CANONICAL_HEADER_LEN) / BYTES_PER_FRAME;
        let frames = self.frame_count();
        if frames > max_frames {
            return Err(ToneError::TooLong { frames, max_frames });
        }

        Ok(())
    }

    /// floor(sample_rate * duration)
    pub fn frame_count(&self) -> Frames {
        (f64::from(self.sample_rate) * self.duration_secs) as Frames
    }
}

/// Synthesize interleaved stereo samples (L, R, L, R, ...)
pub fn synthesize(config: &ToneConfig) -> Result<Vec<Sample>, ToneError> {
    config.validate()?;

    let num_frames = config.frame_count();
    let rate = f64::from(config.sample_rate);
    let mut samples = Vec::with_capacity(num_frames * usize::from(CHANNELS));

    for frame in 0..num_frames {
        let t = frame as f64 / rate;
        let value = config.amplitude * (2.0 * PI * config.frequency * t).sin();
        let sample = config.quantization.quantize(value);

        // Write same sample to both channels
        for _ in 0..CHANNELS {
            samples.push(sample);
        }
    }

    tracing::debug!(
        "Synthesized {} frames at {} Hz ({:.2} Hz tone)",
        num_frames,
        config.sample_rate,
        config.frequency
    );

    Ok(samples)
}

/// Errors for tone parameters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToneError {
    #[error("Sample rate must be greater than zero")]
    InvalidSampleRate,

    #[error("Duration must be a finite, non-negative number of seconds, got {0}")]
    InvalidDuration(f64),

    #[error("Frequency must be a finite, positive number of Hz, got {0}")]
    InvalidFrequency(f64),

    #[error("Amplitude must be in (0.0, 1.0], got {0}")]
    InvalidAmplitude(f64),

    #[error("Tone too long: {frames} frames (max {max_frames} in a WAV file)")]
    TooLong { frames: Frames, max_frames: Frames },
}
