//! C identifiers and output file names for embedded arrays.

use std::path::{Path, PathBuf};

use crate::HeaderError;

/// Replace every character that cannot appear in a C identifier with `_`
///
/// A leading digit gets a `_` prefix so the result is always a valid
/// identifier for non-empty input.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut ident = replace_invalid_chars(raw);
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Replace non-identifier characters with `_`, leaving a leading digit alone
///
/// For fragments appended to a prefix that already starts the identifier.
pub fn replace_invalid_chars(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Whether `name` is already a valid C identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Frequency rendered for use in names: `494` stays `494`, `493.88` becomes `493_88`
pub fn frequency_tag(frequency: f64) -> String {
    frequency.to_string().replace(['.', '-'], "_")
}

/// Names of the array and its length constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayNames {
    pub array: String,
    pub len: String,
}

impl ArrayNames {
    /// Use explicit names, which must already be valid identifiers
    pub fn new(array: impl Into<String>, len: impl Into<String>) -> Result<Self, HeaderError> {
        let names = Self {
            array: array.into(),
            len: len.into(),
        };
        for name in [&names.array, &names.len] {
            if !is_identifier(name) {
                return Err(HeaderError::InvalidIdentifier(name.clone()));
            }
        }
        Ok(names)
    }

    /// `beep_stereo_wav_<tag>` and `beep_stereo_wav_len_<tag>`
    pub fn for_tone(tag: &str) -> Self {
        let tag = replace_invalid_chars(tag);
        Self {
            array: format!("beep_stereo_wav_{tag}"),
            len: format!("beep_stereo_wav_len_{tag}"),
        }
    }

    /// `<name>` and `<name>_len` from a file stem or free-form label
    pub fn from_stem(stem: &str) -> Result<Self, HeaderError> {
        if stem.is_empty() {
            return Err(HeaderError::InvalidIdentifier(String::new()));
        }
        let array = sanitize_identifier(stem);
        let len = format!("{array}_len");
        Ok(Self { array, len })
    }

    /// Derive names from the stem of `path`
    pub fn from_path(path: &Path) -> Result<Self, HeaderError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_stem(&stem)
    }
}

/// Output paths for a generated tone: `beep_stereo_<tag>.wav` and `beep_stereo_<tag>_array.h`
pub fn tone_paths(dir: &Path, tag: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("beep_stereo_{tag}.wav")),
        dir.join(format!("beep_stereo_{tag}_array.h")),
    )
}

/// Default header path for a standalone input: same directory and stem, `.h` extension
pub fn header_path_for(input: &Path) -> PathBuf {
    input.with_extension("h")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("cast_away_fire"), "cast_away_fire");
        assert_eq!(sanitize_identifier("cast-away fire"), "cast_away_fire");
        assert_eq!(sanitize_identifier("493.88"), "_493_88");
        assert_eq!(sanitize_identifier("naïve"), "na_ve");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("beep_stereo_wav_494"));
        assert!(is_identifier("_x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("4beep"));
        assert!(!is_identifier("beep.wav"));
    }

    #[test]
    fn test_frequency_tag() {
        assert_eq!(frequency_tag(494.0), "494");
        assert_eq!(frequency_tag(493.88), "493_88");
        assert_eq!(frequency_tag(440.0), "440");
    }

    #[test]
    fn test_tone_names() {
        let names = ArrayNames::for_tone(&frequency_tag(494.0));
        assert_eq!(names.array, "beep_stereo_wav_494");
        assert_eq!(names.len, "beep_stereo_wav_len_494");

        let names = ArrayNames::for_tone(&frequency_tag(466.16));
        assert_eq!(names.array, "beep_stereo_wav_466_16");
        assert_eq!(names.len, "beep_stereo_wav_len_466_16");
    }

    #[test]
    fn test_tone_tag_keeps_leading_digit() {
        let names = ArrayNames::for_tone("494");
        assert_eq!(names.array, "beep_stereo_wav_494");
        assert!(is_identifier(&names.array));
        assert!(is_identifier(&names.len));

        let names = ArrayNames::for_tone("1.5k");
        assert_eq!(names.array, "beep_stereo_wav_1_5k");
    }

    #[test]
    fn test_replace_invalid_chars() {
        assert_eq!(replace_invalid_chars("493.88"), "493_88");
        assert_eq!(replace_invalid_chars("a b-c"), "a_b_c");
    }

    #[test]
    fn test_names_from_path() {
        let names = ArrayNames::from_path(Path::new("sounds/cast_away_fire.wav")).unwrap();
        assert_eq!(names.array, "cast_away_fire");
        assert_eq!(names.len, "cast_away_fire_len");

        assert!(ArrayNames::from_path(Path::new("")).is_err());
    }

    #[test]
    fn test_explicit_names_validated() {
        assert!(ArrayNames::new("clip", "clip_len").is_ok());
        assert!(matches!(
            ArrayNames::new("clip", "clip len"),
            Err(HeaderError::InvalidIdentifier(name)) if name == "clip len"
        ));
    }

    #[test]
    fn test_output_paths() {
        let (wav, header) = tone_paths(Path::new("out"), "494");
        assert_eq!(wav, Path::new("out/beep_stereo_494.wav"));
        assert_eq!(header, Path::new("out/beep_stereo_494_array.h"));

        assert_eq!(
            header_path_for(Path::new("cast_away_fire.wav")),
            Path::new("cast_away_fire.h")
        );
    }
}
