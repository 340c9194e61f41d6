//! Songs made of named voices, each an ordered list of notes and rests.

use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::note::NoteLabel;

/// The label used for rests in song documents.
pub const REST_LABEL: &str = "REST";

/// The pitch of a note event, or silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Pitch {
    Rest,
    Note(NoteLabel),
}

impl FromStr for Pitch {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        if label == REST_LABEL {
            Ok(Pitch::Rest)
        } else {
            Ok(Pitch::Note(label.parse()?))
        }
    }
}

impl TryFrom<String> for Pitch {
    type Error = Error;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

impl From<Pitch> for String {
    fn from(pitch: Pitch) -> Self {
        pitch.to_string()
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pitch::Rest => f.write_str(REST_LABEL),
            Pitch::Note(label) => fmt::Display::fmt(label, f),
        }
    }
}

/// A note or rest lasting a number of beats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    #[serde(rename = "note")]
    pub pitch: Pitch,
    #[serde(rename = "duration")]
    pub duration_beats: f64,
}

impl NoteEvent {
    pub fn note(label: NoteLabel, duration_beats: f64) -> Self {
        NoteEvent {
            pitch: Pitch::Note(label),
            duration_beats,
        }
    }

    pub fn rest(duration_beats: f64) -> Self {
        NoteEvent {
            pitch: Pitch::Rest,
            duration_beats,
        }
    }
}

/// A named voice of a song.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    name: String,
    events: Vec<NoteEvent>,
}

impl Part {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    /// Parts without events cannot be played.
    pub fn is_playable(&self) -> bool {
        !self.events.is_empty()
    }

    /// The part name with its first letter capitalized, e.g `Soprano` for `soprano`.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Total length of the part in beats.
    pub fn beat_count(&self) -> f64 {
        self.events.iter().map(|event| event.duration_beats).sum()
    }
}

/// A melody with one or more voices, played at a fixed tempo.
///
/// Songs are validated on construction and immutable afterwards: the tempo
/// is positive and every event has a positive duration.
///
/// The JSON form is
/// ```json
/// {
///     "title": "Example",
///     "bpm": 90,
///     "parts": {
///         "soprano": [{ "note": "C4", "duration": 1 }, { "note": "REST", "duration": 0.5 }],
///         "alto": []
///     }
/// }
/// ```
/// Parts keep the order they have in the document. The tempo may be written
/// as `90` or `90.0`, but must be a whole number of beats per minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SongDocument", into = "SongDocument")]
pub struct Song {
    title: String,
    bpm: u32,
    parts: Vec<Part>,
}

impl Song {
    pub fn new<T, P>(title: T, bpm: u32, parts: P) -> Result<Self, Error>
    where
        T: Into<String>,
        P: IntoIterator<Item = (String, Vec<NoteEvent>)>,
    {
        if bpm == 0 {
            return Err(Error::InvalidTempo);
        }

        let parts: Vec<Part> = parts
            .into_iter()
            .map(|(name, events)| Part { name, events })
            .collect();

        for part in parts.iter() {
            for (index, event) in part.events.iter().enumerate() {
                // Also rejects NaN
                if !(event.duration_beats > 0.0 && event.duration_beats.is_finite()) {
                    return Err(Error::InvalidDuration {
                        voice: part.name.clone(),
                        index,
                        duration: event.duration_beats,
                    });
                }
            }
        }

        Ok(Song {
            title: title.into(),
            bpm,
            parts,
        })
    }

    /// Parses a song document. Any invalid note label, tempo or duration
    /// rejects the whole song.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|err| {
            warn!("rejected song document: {}", err);
            Error::from(err)
        })
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// The length of one beat in seconds.
    pub fn beat_duration(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, voice: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.name == voice)
    }

    /// Names of the voices that have at least one event, in document order.
    pub fn playable_voices(&self) -> impl Iterator<Item = &str> + '_ {
        self.parts
            .iter()
            .filter(|part| part.is_playable())
            .map(|part| part.name())
    }
}

#[derive(Serialize, Deserialize)]
struct SongDocument {
    title: String,
    #[serde(deserialize_with = "deserialize_bpm")]
    bpm: u32,
    #[serde(with = "parts_map")]
    parts: Vec<(String, Vec<NoteEvent>)>,
}

/// Accepts any JSON number holding a whole, non-negative tempo. Zero is
/// rejected later by [`Song::new`].
fn deserialize_bpm<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let bpm = f64::deserialize(deserializer)?;
    if bpm.fract() != 0.0 || bpm < 0.0 || bpm > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "tempo must be a whole number of beats per minute, got {}",
            bpm
        )));
    }
    Ok(bpm as u32)
}

impl TryFrom<SongDocument> for Song {
    type Error = Error;

    fn try_from(document: SongDocument) -> Result<Self, Self::Error> {
        Song::new(document.title, document.bpm, document.parts)
    }
}

impl From<Song> for SongDocument {
    fn from(song: Song) -> Self {
        SongDocument {
            title: song.title,
            bpm: song.bpm,
            parts: song
                .parts
                .into_iter()
                .map(|part| (part.name, part.events))
                .collect(),
        }
    }
}

/// (De)serializes parts as a JSON object while keeping the key order.
mod parts_map {
    use core::fmt;

    use serde::de::{self, MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    use super::NoteEvent;

    pub fn serialize<S>(parts: &[(String, Vec<NoteEvent>)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(parts.iter().map(|(name, events)| (name, events)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, Vec<NoteEvent>)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PartsVisitor)
    }

    struct PartsVisitor;

    impl<'de> Visitor<'de> for PartsVisitor {
        type Value = Vec<(String, Vec<NoteEvent>)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map from voice names to lists of notes")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut parts: Vec<(String, Vec<NoteEvent>)> =
                Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, events)) = access.next_entry::<String, Vec<NoteEvent>>()? {
                if parts.iter().any(|(existing, _)| *existing == name) {
                    return Err(de::Error::custom(format!("duplicate voice '{}'", name)));
                }
                parts.push((name, events));
            }
            Ok(parts)
        }
    }
}
