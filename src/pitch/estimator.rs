use core::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::common::{
    autocorr_conv, autocorr_fft, autocorr_fft_size, supports_autocorr_fft, F32ArrayExt,
};
use crate::error::Error;
use crate::note::{note_from_frequency, NoteLabel};

/// Windows with an RMS level below this value are considered silent.
pub const DEFAULT_SILENCE_THRESHOLD: f32 = 0.01;

/// The smallest supported window size.
pub const MIN_WINDOW_SIZE: usize = 8;

/// How the autocorrelation of a window is computed. Both methods
/// produce the same values up to rounding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutocorrMethod {
    /// Time domain summation, O(N²).
    Direct,
    /// Zero padded real FFT, O(N log N). Limited to windows of at most 2048 samples.
    Fft,
}

impl Default for AutocorrMethod {
    fn default() -> Self {
        AutocorrMethod::Direct
    }
}

/// Pitch estimator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorOptions {
    /// RMS level below which a window is reported as [`PitchEstimate::NoSignal`].
    pub silence_threshold: f32,
    pub method: AutocorrMethod,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        EstimatorOptions {
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
            method: AutocorrMethod::default(),
        }
    }
}

/// The outcome of analyzing a single window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchEstimate {
    /// The window is silent or has no discernable period.
    NoSignal,
    /// The estimated fundamental frequency in Hz.
    Detected { frequency: f32 },
}

impl PitchEstimate {
    pub fn is_detected(&self) -> bool {
        matches!(self, PitchEstimate::Detected { .. })
    }

    pub fn frequency(&self) -> Option<f32> {
        match self {
            PitchEstimate::Detected { frequency } => Some(*frequency),
            PitchEstimate::NoSignal => None,
        }
    }

    /// The note closest to the detected frequency.
    pub fn note(&self) -> Option<NoteLabel> {
        self.frequency().map(note_from_frequency)
    }
}

impl fmt::Display for PitchEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitchEstimate::Detected { frequency } => {
                write!(f, "{:.2} Hz ({})", frequency, note_from_frequency(*frequency))
            }
            PitchEstimate::NoSignal => f.write_str("---"),
        }
    }
}

/// Estimates the fundamental frequency of fixed size windows using
/// autocorrelation with parabolic peak refinement.
///
/// Buffers for the autocorrelation are allocated once on creation,
/// [`estimate`](PitchEstimator::estimate) does not allocate.
pub struct PitchEstimator {
    window_size: usize,
    options: EstimatorOptions,
    autocorr: Box<[f32]>,
    scratch: Box<[f32]>,
}

impl PitchEstimator {
    pub fn new(window_size: usize) -> Result<Self, Error> {
        PitchEstimator::from_options(window_size, EstimatorOptions::default())
    }

    /// Creates an estimator for windows of `window_size` samples, which must be a
    /// power of two no smaller than [`MIN_WINDOW_SIZE`].
    pub fn from_options(window_size: usize, options: EstimatorOptions) -> Result<Self, Error> {
        if window_size < MIN_WINDOW_SIZE || !window_size.is_power_of_two() {
            return Err(Error::UnsupportedWindowSize(window_size));
        }

        let (autocorr_size, scratch_size) = match options.method {
            AutocorrMethod::Direct => (window_size, 0),
            AutocorrMethod::Fft => {
                if !supports_autocorr_fft(window_size) {
                    return Err(Error::UnsupportedWindowSize(window_size));
                }
                let fft_size = autocorr_fft_size(window_size, window_size);
                (fft_size, fft_size)
            }
        };

        debug!(
            "created pitch estimator, window size {}, {:?} autocorrelation, silence threshold {}",
            window_size, options.method, options.silence_threshold
        );

        Ok(PitchEstimator {
            window_size,
            options,
            autocorr: vec![0.0; autocorr_size].into_boxed_slice(),
            scratch: vec![0.0; scratch_size].into_boxed_slice(),
        })
    }

    /// Returns the fixed number of samples in a window.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn options(&self) -> &EstimatorOptions {
        &self.options
    }

    /// Estimates the fundamental frequency of a window.
    ///
    /// # Panics
    ///
    /// If the length of `buffer` differs from the window size.
    pub fn estimate(&mut self, buffer: &[f32], sample_rate: f32) -> PitchEstimate {
        if buffer.len() != self.window_size {
            panic!(
                "Got window of length {}, expected {}.",
                buffer.len(),
                self.window_size
            )
        }

        let rms = buffer.rms_level();
        if rms < self.options.silence_threshold {
            trace!("rms {} below silence threshold", rms);
            return PitchEstimate::NoSignal;
        }

        self.compute_autocorr(buffer);
        let autocorr = &self.autocorr[..self.window_size];

        match find_period(autocorr) {
            Some(period) if period > 0.0 && period.is_finite() => {
                let frequency = sample_rate / period;
                trace!("period {} samples, {} Hz", period, frequency);
                PitchEstimate::Detected { frequency }
            }
            _ => {
                trace!("no periodicity found");
                PitchEstimate::NoSignal
            }
        }
    }

    fn compute_autocorr(&mut self, buffer: &[f32]) {
        match self.options.method {
            AutocorrMethod::Direct => autocorr_conv(buffer, &mut self.autocorr[..]),
            AutocorrMethod::Fft => autocorr_fft(
                buffer,
                &mut self.autocorr[..],
                &mut self.scratch[..],
                self.window_size,
            ),
        }
    }
}

/// Returns the (fractional) lag of the dominant autocorrelation peak
/// following the initial falloff from lag 0, or `None` if the
/// autocorrelation decreases all the way to the last lag.
fn find_period(autocorr: &[f32]) -> Option<f32> {
    let last = autocorr.len() - 1;

    // Skip the zero lag peak
    let mut lag = 0;
    while lag < last && autocorr[lag] > autocorr[lag + 1] {
        lag += 1;
    }
    if lag == last {
        return None;
    }

    let mut max_index = lag;
    let mut max_value = autocorr[lag];
    for (index, value) in autocorr.iter().enumerate().skip(lag + 1) {
        if *value > max_value {
            max_value = *value;
            max_index = index;
        }
    }

    Some(refine_peak(autocorr, max_index))
}

/// Moves a peak index towards the vertex of the parabola through the peak
/// and its neighbors. Peaks at either end of the array, or with zero
/// curvature, are returned unchanged.
fn refine_peak(autocorr: &[f32], index: usize) -> f32 {
    if index == 0 || index + 1 >= autocorr.len() {
        return index as f32;
    }

    // Coefficients of a parabola ax^2 + bx + c passing through
    // (-1, left), (0, center), (1, right)
    let left = autocorr[index - 1];
    let center = autocorr[index];
    let right = autocorr[index + 1];
    let a = (left + right - 2.0 * center) / 2.0;
    let b = (right - left) / 2.0;

    if a == 0.0 {
        index as f32
    } else {
        index as f32 - b / (2.0 * a)
    }
}
