//! Fundamental frequency estimation for monophonic signals, using the
//! [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation) of a window
//! of samples. The estimator skips the falloff from the zero lag peak, picks
//! the largest remaining autocorrelation peak as the period and refines it to
//! sub-sample accuracy with parabolic interpolation.
//!
//! It cannot be used to detect multiple pitches at once, like in a musical chord.
//!
//! # Example
//! ```
//! use micro_tuner::pitch::{PitchEstimate, PitchEstimator, SampleWindow};
//!
//! let sample_rate = 44100.0;
//! let window_size = 2048;
//! let mut window = SampleWindow::new(window_size);
//! let mut estimator = PitchEstimator::new(window_size).unwrap();
//!
//! // Feed the window with chunks of a 440 Hz tone, as a capture callback would.
//! let chunk: Vec<f32> = (0..4096)
//!     .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 440.0 * (i as f32) / sample_rate).sin())
//!     .collect();
//! for part in chunk.chunks(512) {
//!     window.push(part);
//! }
//!
//! match estimator.estimate(window.samples(), sample_rate) {
//!     PitchEstimate::Detected { frequency } => assert!((frequency - 440.0).abs() < 4.4),
//!     PitchEstimate::NoSignal => panic!("expected a pitch"),
//! }
//! ```

mod estimator;
mod window;

pub use estimator::{
    AutocorrMethod, EstimatorOptions, PitchEstimate, PitchEstimator, DEFAULT_SILENCE_THRESHOLD,
    MIN_WINDOW_SIZE,
};
pub use window::SampleWindow;
