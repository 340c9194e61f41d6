//! Error types.

use thiserror::Error;

/// Errors produced while building estimators, parsing songs and scheduling tones.
///
/// Not detecting a pitch is not an error, see
/// [`PitchEstimate::NoSignal`](crate::pitch::PitchEstimate::NoSignal).
#[derive(Debug, Error)]
pub enum Error {
    /// The requested voice is missing from the song or has no events.
    #[error("voice '{0}' is not present in the song or has no notes")]
    InvalidVoice(String),
    /// A note label does not match `<letter>[#]<octave>`.
    #[error("invalid note label '{0}'")]
    InvalidNoteFormat(String),
    #[error("tempo must be greater than 0 bpm")]
    InvalidTempo,
    #[error("event {index} of voice '{voice}' has non-positive duration {duration}")]
    InvalidDuration {
        voice: String,
        index: usize,
        duration: f64,
    },
    #[error("unsupported window size {0}")]
    UnsupportedWindowSize(usize),
    #[error("invalid song document: {0}")]
    Json(#[from] serde_json::Error),
}
