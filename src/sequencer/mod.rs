//! Turns a voice of a [`Song`] into [`ScheduledTone`]s on an audio clock.
//!
//! The sequencer does not play anything itself. It returns a [`Schedule`]
//! that an audio engine executes against its own clock, shaping each tone
//! with a [`ToneEnvelope`]. The caller signals the end of playback once the
//! audio clock reaches [`Schedule::end_time`].
//!
//! # Example
//! ```
//! use micro_tuner::sequencer::{schedule, Song};
//!
//! let song = Song::from_json(r#"{
//!     "title": "Scale",
//!     "bpm": 60,
//!     "parts": {
//!         "soprano": [
//!             { "note": "C4", "duration": 1 },
//!             { "note": "REST", "duration": 1 },
//!             { "note": "D4", "duration": 2 }
//!         ]
//!     }
//! }"#).unwrap();
//!
//! let schedule = schedule(&song, "soprano", 0.0).unwrap();
//! assert_eq!(schedule.tones().len(), 2);
//! assert_eq!(schedule.tones()[1].start_time, 2.0);
//! assert_eq!(schedule.total_duration(), 4.0);
//! ```

mod envelope;
mod schedule;
mod song;

pub use envelope::{
    GainPoint, ToneEnvelope, Waveform, DEFAULT_ATTACK, DEFAULT_PEAK_GAIN, DEFAULT_RELEASE,
};
pub use schedule::{schedule, Schedule, ScheduledTone};
pub use song::{NoteEvent, Part, Pitch, Song, REST_LABEL};
