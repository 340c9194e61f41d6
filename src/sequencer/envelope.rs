//! Rendering contract for scheduled tones.
//!
//! Each [`ScheduledTone`] is played by a single periodic voice whose gain
//! ramps linearly from 0 to a peak during the attack, holds, and ramps back
//! to 0 during the release, which ends exactly at the end of the tone.
//! Starting and stopping at zero gain avoids audible clicks.

use core::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::sequencer::schedule::ScheduledTone;

pub const DEFAULT_ATTACK: f64 = 0.02;
pub const DEFAULT_RELEASE: f64 = 0.05;
pub const DEFAULT_PEAK_GAIN: f32 = 0.5;

/// The periodic waveform of the tone voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::Sine
    }
}

impl Waveform {
    /// Returns the waveform value at `phase`, in cycles. Values are in [-1, 1].
    pub fn sample(self, phase: f32) -> f32 {
        let phase = phase - phase.floor();
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
        }
    }
}

/// A point on a linear gain automation curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainPoint {
    /// Audio clock time in seconds.
    pub time: f64,
    pub gain: f32,
}

/// Attack/hold/release gain envelope applied to every scheduled tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneEnvelope {
    /// Attack time in seconds.
    pub attack: f64,
    /// Release time in seconds.
    pub release: f64,
    pub peak_gain: f32,
}

impl Default for ToneEnvelope {
    fn default() -> Self {
        ToneEnvelope {
            attack: DEFAULT_ATTACK,
            release: DEFAULT_RELEASE,
            peak_gain: DEFAULT_PEAK_GAIN,
        }
    }
}

impl ToneEnvelope {
    /// Attack and release times for a tone of a given duration. Tones shorter
    /// than attack + release get proportionally shorter ramps.
    fn ramp_times(&self, duration: f64) -> (f64, f64) {
        let ramp_time = self.attack + self.release;
        if ramp_time > duration && ramp_time > 0.0 {
            let scale = duration / ramp_time;
            (self.attack * scale, self.release * scale)
        } else {
            (self.attack, self.release)
        }
    }

    /// The breakpoints of the gain curve of a tone, to be connected with
    /// linear ramps: start of attack, end of attack, start of release, end of release.
    pub fn automation(&self, tone: &ScheduledTone) -> [GainPoint; 4] {
        let (attack, release) = self.ramp_times(tone.duration);
        let end_time = tone.end_time();
        [
            GainPoint {
                time: tone.start_time,
                gain: 0.0,
            },
            GainPoint {
                time: tone.start_time + attack,
                gain: self.peak_gain,
            },
            GainPoint {
                time: end_time - release,
                gain: self.peak_gain,
            },
            GainPoint {
                time: end_time,
                gain: 0.0,
            },
        ]
    }

    /// Evaluates the gain of a tone at audio clock time `time`.
    /// The gain is zero outside the tone.
    pub fn gain_at(&self, tone: &ScheduledTone, time: f64) -> f32 {
        let end_time = tone.end_time();
        if time < tone.start_time || time >= end_time {
            return 0.0;
        }
        let (attack, release) = self.ramp_times(tone.duration);
        let since_start = time - tone.start_time;
        let until_end = end_time - time;
        let level = if since_start < attack {
            since_start / attack
        } else if until_end < release {
            until_end / release
        } else {
            1.0
        };
        self.peak_gain * level as f32
    }

    /// Adds a tone to `output`, whose first sample is at audio clock time
    /// `buffer_start_time`. Samples outside the tone are left unchanged.
    pub fn render(
        &self,
        tone: &ScheduledTone,
        waveform: Waveform,
        sample_rate: f32,
        buffer_start_time: f64,
        output: &mut [f32],
    ) {
        let sample_period = 1.0 / sample_rate as f64;
        for (index, sample) in output.iter_mut().enumerate() {
            let time = buffer_start_time + index as f64 * sample_period;
            let gain = self.gain_at(tone, time);
            if gain > 0.0 {
                // Phase relative to the tone start, so every tone starts at phase 0
                let cycles = (time - tone.start_time) * tone.frequency as f64;
                *sample += gain * waveform.sample(cycles.fract() as f32);
            }
        }
    }
}
