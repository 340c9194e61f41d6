//! Common algorithms and utilities.

mod autocorr;
mod f32_array_ext;
mod fft;
mod midi;

pub use autocorr::{autocorr_conv, autocorr_fft, autocorr_fft_size, supports_autocorr_fft};
pub use f32_array_ext::F32ArrayExt;
pub use fft::{real_fft, MAX_REAL_FFT_SIZE};
pub use midi::{freq_to_midi_note, midi_note_to_freq, A4_FREQUENCY, A4_MIDI_NOTE};
