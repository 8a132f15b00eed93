//! WAV container writing and parsing.
//!
//! Writing goes through `hound` into memory and is then published
//! atomically. Parsing is the minimal RIFF walk the firmware performs on
//! an embedded array, so a header can be checked on the host before it
//! is flashed.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use wavembed_core::layout::{BITS_PER_SAMPLE, CANONICAL_HEADER_LEN, CHANNELS};
use wavembed_core::{Frames, Sample, SampleRate};

use crate::tone::{ToneConfig, ToneError, synthesize};

/// PCM format code in the `fmt ` chunk
pub const FORMAT_PCM: u16 = 1;

/// Spec for the fixed stereo 16-bit container
pub fn stereo_spec(sample_rate: SampleRate) -> WavSpec {
    WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Serialize interleaved samples into a complete WAV file image
pub fn encode_wav(samples: &[Sample], spec: WavSpec) -> Result<Vec<u8>, ContainerError> {
    let channels = usize::from(spec.channels);
    if channels == 0 || samples.len() % channels != 0 {
        return Err(ContainerError::PartialFrame {
            samples: samples.len(),
            channels: spec.channels,
        });
    }

    let mut cursor = Cursor::new(Vec::with_capacity(
        CANONICAL_HEADER_LEN + samples.len() * 2,
    ));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Outcome of writing a tone to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneReport {
    pub path: PathBuf,
    pub frames: Frames,
    pub bytes: usize,
}

/// Synthesize `config` and atomically write it as a WAV file
pub fn write_tone(config: &ToneConfig, path: impl AsRef<Path>) -> Result<ToneReport, ContainerError> {
    let path = path.as_ref();
    let samples = synthesize(config)?;
    let wav = encode_wav(&samples, stereo_spec(config.sample_rate))?;

    wavembed_core::fs::write_atomic(path, &wav)?;

    let report = ToneReport {
        path: path.to_path_buf(),
        frames: samples.len() / usize::from(CHANNELS),
        bytes: wav.len(),
    };
    tracing::info!(
        "Wrote {} ({} frames, {} bytes)",
        path.display(),
        report.frames,
        report.bytes
    );
    Ok(report)
}

/// Errors while producing a container
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error(transparent)]
    Tone(#[from] ToneError),

    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("{samples} samples do not divide into {channels}-channel frames")]
    PartialFrame { samples: usize, channels: u16 },

    #[error(transparent)]
    Core(#[from] wavembed_core::Error),
}

/// Header fields of a PCM WAV image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: SampleRate,
    pub bits_per_sample: u16,
    /// Byte offset of the first sample
    pub data_offset: usize,
    /// Length of the `data` chunk in bytes
    pub data_len: usize,
}

impl WavInfo {
    /// Walk the RIFF chunks of `buf` and extract the PCM format and data location
    pub fn parse(buf: &[u8]) -> Result<Self, WavParseError> {
        if buf.len() < CANONICAL_HEADER_LEN {
            return Err(WavParseError::TooSmall(buf.len()));
        }
        if &buf[0..4] != b"RIFF" {
            return Err(WavParseError::MissingRiff);
        }
        if &buf[8..12] != b"WAVE" {
            return Err(WavParseError::MissingWave);
        }

        let mut offset: usize = 12;
        let mut format: Option<(u16, u16, u32, u16)> = None;

        while offset.checked_add(8).is_some_and(|header_end| header_end <= buf.len()) {
            let id = &buf[offset..offset + 4];
            let size = read_u32(buf, offset + 4) as usize;
            let body = offset + 8;
            let end = body.saturating_add(size);

            match id {
                b"fmt " => {
                    if size < 16 {
                        return Err(WavParseError::FmtTooShort(size));
                    }
                    if end > buf.len() {
                        return Err(WavParseError::ChunkOutOfRange {
                            id: "fmt ",
                            offset,
                            size,
                        });
                    }
                    format = Some((
                        read_u16(buf, body),
                        read_u16(buf, body + 2),
                        read_u32(buf, body + 4),
                        // skip byte rate and block align
                        read_u16(buf, body + 14),
                    ));
                }
                b"data" => {
                    let Some((audio_format, channels, sample_rate, bits_per_sample)) = format
                    else {
                        return Err(WavParseError::DataBeforeFmt);
                    };
                    if end > buf.len() {
                        return Err(WavParseError::ChunkOutOfRange {
                            id: "data",
                            offset,
                            size,
                        });
                    }
                    if audio_format != FORMAT_PCM {
                        return Err(WavParseError::NotPcm(audio_format));
                    }
                    return Ok(Self {
                        audio_format,
                        channels,
                        sample_rate,
                        bits_per_sample,
                        data_offset: body,
                        data_len: size,
                    });
                }
                other => {
                    tracing::trace!(
                        "Skipping chunk {:?} ({} bytes)",
                        String::from_utf8_lossy(other),
                        size
                    );
                }
            }

            // Chunks are padded to an even length
            offset = end.saturating_add(size & 1);
        }

        if format.is_some() {
            Err(WavParseError::MissingData)
        } else {
            Err(WavParseError::MissingFmt)
        }
    }

    /// Bytes per frame across all channels
    pub fn block_align(&self) -> usize {
        usize::from(self.channels) * usize::from(self.bits_per_sample).div_ceil(8)
    }

    /// Number of whole frames in the `data` chunk
    pub fn frame_count(&self) -> Frames {
        match self.block_align() {
            0 => 0,
            align => self.data_len / align,
        }
    }

    /// Playback length in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }

    /// The raw sample bytes inside `buf`
    pub fn data<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.data_offset..self.data_offset + self.data_len]
    }
}

fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

/// Reasons a byte buffer is not a usable PCM WAV image
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WavParseError {
    #[error("Buffer too small to be a WAV file: {0} bytes")]
    TooSmall(usize),

    #[error("Missing RIFF tag")]
    MissingRiff,

    #[error("Missing WAVE tag")]
    MissingWave,

    #[error("fmt chunk too short: {0} bytes (need 16)")]
    FmtTooShort(usize),

    #[error("{id:?} chunk at offset {offset} ({size} bytes) runs past end of buffer")]
    ChunkOutOfRange {
        id: &'static str,
        offset: usize,
        size: usize,
    },

    #[error("data chunk found before fmt chunk")]
    DataBeforeFmt,

    #[error("Missing fmt chunk")]
    MissingFmt,

    #[error("Missing data chunk")]
    MissingData,

    #[error("Not PCM audio (format code {0})")]
    NotPcm(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-built minimal header followed by `data`
    fn wav_bytes(format: u16, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&format.to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&48000u32.to_le_bytes());
        buf.extend_from_slice(&192_000u32.to_le_bytes());
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(data);
        buf
    }

    #[test]
    fn test_default_tone_sizes() {
        let config = ToneConfig::default();
        let samples = synthesize(&config).unwrap();
        let wav = encode_wav(&samples, stereo_spec(config.sample_rate)).unwrap();

        assert_eq!(wav.len(), 96_044);

        let info = WavInfo::parse(&wav).unwrap();
        assert_eq!(info.data_offset, CANONICAL_HEADER_LEN);
        assert_eq!(info.data_len, 96_000);
        assert_eq!(info.frame_count(), 24_000);
        assert_eq!(info.channels, 2);
        assert_eq!(info.sample_rate, 48_000);
        assert_eq!(info.bits_per_sample, 16);
        assert_eq!(info.duration_secs(), 0.5);
    }

    #[test]
    fn test_samples_little_endian() {
        let wav = encode_wav(&[1, 1, -2, -2], stereo_spec(48_000)).unwrap();
        let info = WavInfo::parse(&wav).unwrap();
        assert_eq!(
            info.data(&wav),
            &[0x01, 0x00, 0x01, 0x00, 0xFE, 0xFF, 0xFE, 0xFF]
        );
    }

    #[test]
    fn test_empty_container() {
        let wav = encode_wav(&[], stereo_spec(48_000)).unwrap();
        assert_eq!(wav.len(), CANONICAL_HEADER_LEN);

        let info = WavInfo::parse(&wav).unwrap();
        assert_eq!(info.data_len, 0);
        assert_eq!(info.frame_count(), 0);
    }

    #[test]
    fn test_partial_frame_rejected() {
        let err = encode_wav(&[1, 2, 3], stereo_spec(48_000)).unwrap_err();
        assert!(matches!(err, ContainerError::PartialFrame { samples: 3, .. }));
    }

    #[test]
    fn test_frame_count_round_trip() {
        for &(rate, duration) in &[(48_000, 0.5), (44_100, 0.025), (8_000, 1.3), (22_050, 0.0)] {
            let config = ToneConfig {
                sample_rate: rate,
                duration_secs: duration,
                ..ToneConfig::default()
            };
            let samples = synthesize(&config).unwrap();
            let wav = encode_wav(&samples, stereo_spec(rate)).unwrap();
            let info = WavInfo::parse(&wav).unwrap();

            assert_eq!(info.frame_count(), config.frame_count());
            assert_eq!(info.data_len, config.frame_count() * 4);
        }
    }

    #[test]
    fn test_write_tone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beep_stereo_494.wav");

        let report = write_tone(&ToneConfig::default(), &path).unwrap();
        assert_eq!(report.frames, 24_000);
        assert_eq!(report.bytes, 96_044);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec(), stereo_spec(48_000));
        assert_eq!(reader.duration(), 24_000);
    }

    #[test]
    fn test_write_tone_invalid_config_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        let config = ToneConfig {
            sample_rate: 0,
            ..ToneConfig::default()
        };

        let err = write_tone(&config, &path).unwrap_err();
        assert!(matches!(err, ContainerError::Tone(ToneError::InvalidSampleRate)));
        assert!(!path.exists());
    }

    #[test]
    fn test_parse_skips_unknown_chunks() {
        let mut buf = wav_bytes(FORMAT_PCM, &[0; 8]);
        // Insert an odd-sized LIST chunk (with pad byte) between fmt and data
        let list: Vec<u8> = [&b"LIST"[..], &3u32.to_le_bytes()[..], &b"abc"[..], &[0u8][..]].concat();
        buf.splice(36..36, list);

        let info = WavInfo::parse(&buf).unwrap();
        assert_eq!(info.data_offset, 36 + 12 + 8);
        assert_eq!(info.data_len, 8);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(WavInfo::parse(&[0; 10]), Err(WavParseError::TooSmall(10)));

        let mut no_riff = wav_bytes(FORMAT_PCM, &[]);
        no_riff[0] = b'X';
        assert_eq!(WavInfo::parse(&no_riff), Err(WavParseError::MissingRiff));

        let mut no_wave = wav_bytes(FORMAT_PCM, &[]);
        no_wave[8] = b'X';
        assert_eq!(WavInfo::parse(&no_wave), Err(WavParseError::MissingWave));

        let mut short_fmt = wav_bytes(FORMAT_PCM, &[]);
        short_fmt[16] = 8;
        assert_eq!(WavInfo::parse(&short_fmt), Err(WavParseError::FmtTooShort(8)));

        let mut long_data = wav_bytes(FORMAT_PCM, &[0; 4]);
        long_data[40] = 200;
        assert!(matches!(
            WavInfo::parse(&long_data),
            Err(WavParseError::ChunkOutOfRange { id: "data", .. })
        ));

        assert_eq!(
            WavInfo::parse(&wav_bytes(3, &[0; 4])),
            Err(WavParseError::NotPcm(3))
        );
    }

    #[test]
    fn test_parse_data_before_fmt() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&40u32.to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&24u32.to_le_bytes());
        buf.extend_from_slice(&[0; 24]);

        assert_eq!(WavInfo::parse(&buf), Err(WavParseError::DataBeforeFmt));
    }

    #[test]
    fn test_parse_huge_unknown_chunk() {
        let mut buf = wav_bytes(FORMAT_PCM, &[0; 8]);
        // Unknown chunk claiming the largest possible size pushes the
        // next offset far past the buffer
        buf[36..40].copy_from_slice(b"junk");
        buf[40..44].copy_from_slice(&u32::MAX.to_le_bytes());

        assert_eq!(WavInfo::parse(&buf), Err(WavParseError::MissingData));
    }

    #[test]
    fn test_parse_missing_data() {
        let mut buf = wav_bytes(FORMAT_PCM, &[0; 8]);
        buf[36..40].copy_from_slice(b"junk");

        assert_eq!(WavInfo::parse(&buf), Err(WavParseError::MissingData));
    }
}
