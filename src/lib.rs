//! Real time [pitch](https://en.wikipedia.org/wiki/Pitch_%28music%29) estimation for
//! monophonic input and scheduling of melodies as synthetic tones.
//!
//! * [`pitch`] estimates the fundamental frequency of a window of samples using
//! autocorrelation and parabolic interpolation.
//! * [`sequencer`] converts a voice of a [`Song`](sequencer::Song) into tones
//! timed against an audio clock.
//! * [`note`] converts between frequencies and note names like `A4`.
//!
//! Both components are plain computations over their arguments. Capturing audio,
//! driving the polling loop and executing a schedule are left to the caller.
//!
//! ```
//! use micro_tuner::note::{note_from_frequency, note_to_frequency};
//!
//! assert_eq!(note_from_frequency(261.63).to_string(), "C4");
//! assert_eq!(note_to_frequency("A4").unwrap(), 440.0);
//! ```

pub mod common;
mod error;
pub mod note;
pub mod pitch;
pub mod sequencer;

pub use error::Error;
