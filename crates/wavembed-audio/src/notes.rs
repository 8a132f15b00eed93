//! Equal-tempered note frequencies.
//!
//! Same lookup table the firmware uses to decide which note a key press
//! should produce, so tones generated here line up with what the board
//! expects.

use std::fmt;
use std::str::FromStr;

/// Number of octaves in the table (0 through 7)
pub const NUM_OCTAVES: u8 = 8;

/// Notes per octave
pub const NUM_NOTES: usize = 12;

const NOTE_FREQUENCIES: [[f64; NUM_NOTES]; NUM_OCTAVES as usize] = [
    [16.35, 17.32, 18.35, 19.45, 20.60, 21.83, 23.12, 24.50, 25.96, 27.50, 29.14, 30.87],
    [32.70, 34.65, 36.71, 38.89, 41.20, 43.65, 46.25, 49.00, 51.91, 55.00, 58.27, 61.74],
    [65.41, 69.30, 73.42, 77.78, 82.41, 87.31, 92.50, 98.00, 103.83, 110.00, 116.54, 123.47],
    [130.81, 138.59, 146.83, 155.56, 164.81, 174.61, 185.00, 196.00, 207.65, 220.00, 233.08, 246.94],
    [261.63, 277.18, 293.66, 311.13, 329.63, 349.23, 369.99, 392.00, 415.30, 440.00, 466.16, 493.88],
    [523.25, 554.37, 587.33, 622.25, 659.25, 698.46, 739.99, 783.99, 830.61, 880.00, 932.33, 987.77],
    [1046.50, 1108.73, 1174.66, 1244.51, 1318.51, 1396.91, 1479.98, 1567.98, 1661.22, 1760.00, 1864.66, 1975.53],
    [2093.00, 2217.46, 2349.32, 2489.02, 2637.02, 2793.83, 2959.96, 3135.96, 3322.44, 3520.00, 3729.31, 3951.07],
];

/// One of the twelve pitch classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Note {
    pub const ALL: [Self; NUM_NOTES] = [
        Self::C,
        Self::CSharp,
        Self::D,
        Self::DSharp,
        Self::E,
        Self::F,
        Self::FSharp,
        Self::G,
        Self::GSharp,
        Self::A,
        Self::ASharp,
        Self::B,
    ];

    /// Semitones above C
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::CSharp => "C#",
            Self::D => "D",
            Self::DSharp => "D#",
            Self::E => "E",
            Self::F => "F",
            Self::FSharp => "F#",
            Self::G => "G",
            Self::GSharp => "G#",
            Self::A => "A",
            Self::ASharp => "A#",
            Self::B => "B",
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Frequency of `note` in `octave`, or `None` past the table
pub fn note_frequency(note: Note, octave: u8) -> Option<f64> {
    NOTE_FREQUENCIES
        .get(usize::from(octave))
        .map(|row| row[note.index()])
}

/// A note name with octave, e.g. `B4`, `C#4`, `Db5`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub note: Note,
    pub octave: u8,
}

impl Pitch {
    pub fn frequency(self) -> Option<f64> {
        note_frequency(self.note, self.octave)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}

impl FromStr for Pitch {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or(NoteError::Empty)?;

        let natural: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            other => return Err(NoteError::InvalidLetter(other)),
        };

        let rest = chars.as_str();
        let (shift, octave_str) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };

        let octave: i32 = octave_str
            .parse()
            .map_err(|_| NoteError::InvalidOctave(octave_str.to_string()))?;

        // Cb and B# cross the octave boundary
        let semitone = natural + shift;
        let octave = octave + semitone.div_euclid(NUM_NOTES as i32);
        let semitone = semitone.rem_euclid(NUM_NOTES as i32);

        let octave = u8::try_from(octave)
            .ok()
            .filter(|&o| o < NUM_OCTAVES)
            .ok_or_else(|| NoteError::OctaveOutOfRange(s.to_string()))?;

        Ok(Self {
            note: Note::ALL[semitone as usize],
            octave,
        })
    }
}

/// Errors parsing a note name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteError {
    #[error("Empty note name")]
    Empty,

    #[error("Invalid note letter: {0:?}")]
    InvalidLetter(char),

    #[error("Invalid octave: {0:?}")]
    InvalidOctave(String),

    #[error("Note {0:?} is outside octaves 0-7")]
    OctaveOutOfRange(String),
}
