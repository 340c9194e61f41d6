//! Equal tempered note names and their frequencies, relative to A4 = 440 Hz.
//!
//! A [`NoteLabel`] is a pitch class in sharp notation followed by an octave
//! number, for example `A4`, `C#3` or `C-1` (MIDI note 0). Parsed octaves
//! range from [`MIN_OCTAVE`] to [`MAX_OCTAVE`].

use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{freq_to_midi_note, midi_note_to_freq};
use crate::error::Error;

/// The lowest octave accepted when parsing a label. `C-1` is MIDI note 0.
pub const MIN_OCTAVE: i32 = -1;
/// The highest octave accepted when parsing a label. `G9` is MIDI note 127.
pub const MAX_OCTAVE: i32 = 9;

/// The twelve pitch classes of the chromatic scale, starting at C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
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

impl PitchClass {
    /// All pitch classes in chromatic order.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    const NAMES: [&'static str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];

    /// The number of semitones above C.
    pub fn offset(self) -> i32 {
        self as i32
    }

    /// Returns the pitch class a given number of semitones above C,
    /// wrapping around the octave in both directions.
    pub fn from_offset(offset: i32) -> Self {
        PitchClass::ALL[offset.rem_euclid(12) as usize]
    }

    pub fn name(self) -> &'static str {
        PitchClass::NAMES[self as usize]
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A note name with an octave number, e.g `A4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteLabel {
    pub pitch_class: PitchClass,
    pub octave: i32,
}

impl NoteLabel {
    pub fn new(pitch_class: PitchClass, octave: i32) -> Self {
        NoteLabel {
            pitch_class,
            octave,
        }
    }

    /// Returns the note with a given MIDI note number. Note 69 is A4.
    pub fn from_midi_note(note: i32) -> Self {
        NoteLabel {
            pitch_class: PitchClass::from_offset(note),
            octave: note.div_euclid(12) - 1,
        }
    }

    /// The MIDI note number of this note.
    pub fn midi_note(&self) -> i32 {
        self.pitch_class.offset() + (self.octave + 1) * 12
    }

    /// The equal tempered frequency of this note in Hz.
    pub fn frequency(&self) -> f32 {
        midi_note_to_freq(self.midi_note())
    }
}

impl fmt::Display for NoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

impl FromStr for NoteLabel {
    type Err = Error;

    /// Parses `<letter>[#]<octave>`, where the letter is one of `A`-`G`
    /// and the octave is an integer from [`MIN_OCTAVE`] to [`MAX_OCTAVE`].
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidNoteFormat(label.to_string());

        let mut chars = label.chars();
        let base = match chars.next() {
            Some('C') => PitchClass::C,
            Some('D') => PitchClass::D,
            Some('E') => PitchClass::E,
            Some('F') => PitchClass::F,
            Some('G') => PitchClass::G,
            Some('A') => PitchClass::A,
            Some('B') => PitchClass::B,
            _ => return Err(invalid()),
        };

        let mut rest = chars.as_str();
        let pitch_class = match rest.strip_prefix('#') {
            Some(after_sharp) => {
                rest = after_sharp;
                match base {
                    // No E# or B# in the sharp spelling
                    PitchClass::E | PitchClass::B => return Err(invalid()),
                    _ => PitchClass::from_offset(base.offset() + 1),
                }
            }
            None => base,
        };

        let digits = rest.strip_prefix('-').unwrap_or(rest);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let octave: i32 = rest.parse().map_err(|_| invalid())?;
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
            return Err(invalid());
        }

        Ok(NoteLabel {
            pitch_class,
            octave,
        })
    }
}

impl TryFrom<String> for NoteLabel {
    type Error = Error;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

impl From<NoteLabel> for String {
    fn from(label: NoteLabel) -> Self {
        label.to_string()
    }
}

/// Returns the equal tempered note closest to a given frequency.
/// `freq` must be greater than zero.
pub fn note_from_frequency(freq: f32) -> NoteLabel {
    debug_assert!(freq > 0.0, "frequency must be positive, got {}", freq);
    let note = freq_to_midi_note(freq).round() as i32;
    NoteLabel::from_midi_note(note)
}

/// Parses a note label like `A4` and returns its frequency in Hz.
pub fn note_to_frequency(label: &str) -> Result<f32, Error> {
    Ok(label.parse::<NoteLabel>()?.frequency())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_notes() {
        assert_eq!(note_from_frequency(440.0).to_string(), "A4");
        assert_eq!(note_from_frequency(261.63).to_string(), "C4");
        assert_eq!(note_from_frequency(27.5).to_string(), "A0");
        assert_eq!(note_from_frequency(8.1758).to_string(), "C-1");
        // Slightly sharp or flat input snaps to the nearest note
        assert_eq!(note_from_frequency(450.0).to_string(), "A4");
        assert_eq!(note_from_frequency(430.0).to_string(), "A4");
        assert_eq!(note_from_frequency(466.0).to_string(), "A#4");
    }

    #[test]
    fn test_note_to_frequency() {
        assert_eq!(note_to_frequency("A4").unwrap(), 440.0);
        assert!((note_to_frequency("C4").unwrap() - 261.63).abs() <= 0.01);
        assert!((note_to_frequency("D4").unwrap() - 293.66).abs() <= 0.01);
        assert!((note_to_frequency("F#2").unwrap() - 92.50).abs() <= 0.01);
    }

    #[test]
    fn test_round_trip() {
        for midi_note in 0..128 {
            let label = NoteLabel::from_midi_note(midi_note);
            let text = label.to_string();
            let frequency = note_to_frequency(&text).unwrap();
            assert_eq!(note_from_frequency(frequency), label);
            assert_eq!(note_from_frequency(frequency).to_string(), text);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "C#3".parse::<NoteLabel>().unwrap(),
            NoteLabel::new(PitchClass::CSharp, 3)
        );
        assert_eq!(
            "B-1".parse::<NoteLabel>().unwrap(),
            NoteLabel::new(PitchClass::B, -1)
        );
        assert_eq!("C-1".parse::<NoteLabel>().unwrap().midi_note(), 0);
        assert_eq!("A4".parse::<NoteLabel>().unwrap().midi_note(), 69);
    }

    #[test]
    fn test_invalid_labels() {
        for label in &[
            "", "H4", "a4", "A", "A#", "E#4", "B#2", "Db4", "A4.5", "A+4", "A--1", "REST", " A4",
            // Octaves outside -1..=9
            "C-2", "C10", "C300", "C2147483647", "C-2147483648", "C99999999999",
        ] {
            match note_to_frequency(label) {
                Err(Error::InvalidNoteFormat(text)) => assert_eq!(text, *label),
                other => panic!("expected InvalidNoteFormat for {:?}, got {:?}", label, other),
            }
        }
    }

    #[test]
    fn test_octave_limits() {
        let lowest = "C-1".parse::<NoteLabel>().unwrap();
        let highest = "B9".parse::<NoteLabel>().unwrap();
        assert_eq!(lowest.midi_note(), 0);
        assert_eq!(highest.midi_note(), 131);
        for label in &[lowest, highest] {
            let frequency = label.frequency();
            assert!(frequency.is_finite() && frequency > 0.0);
            assert_eq!(note_from_frequency(frequency), *label);
        }
    }

    #[test]
    fn test_pitch_class_wraps() {
        assert_eq!(PitchClass::from_offset(-1), PitchClass::B);
        assert_eq!(PitchClass::from_offset(13), PitchClass::CSharp);
        assert_eq!(NoteLabel::from_midi_note(-1), NoteLabel::new(PitchClass::B, -2));
    }

    #[test]
    fn test_serde() {
        let label: NoteLabel = serde_json::from_str("\"G#5\"").unwrap();
        assert_eq!(label, NoteLabel::new(PitchClass::GSharp, 5));
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"G#5\"");
        assert!(serde_json::from_str::<NoteLabel>("\"X5\"").is_err());
    }
}
