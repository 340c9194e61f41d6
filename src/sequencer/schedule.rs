use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sequencer::song::{Pitch, Song};

/// A tone to be played by a synthesis engine, timed against its audio clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTone {
    /// Frequency in Hz.
    pub frequency: f32,
    /// Start time in audio clock seconds.
    pub start_time: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl ScheduledTone {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// The tones of one voice of a song, in playback order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    tones: Vec<ScheduledTone>,
    start_time: f64,
    total_duration: f64,
}

impl Schedule {
    pub fn tones(&self) -> &[ScheduledTone] {
        &self.tones
    }

    pub fn into_tones(self) -> Vec<ScheduledTone> {
        self.tones
    }

    /// The audio clock time the schedule was computed for.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// The length of the voice in seconds, including rests.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.total_duration
    }

    /// Returns true if playback has ended at audio clock time `now`.
    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.end_time()
    }
}

/// Converts a voice of a song into tones starting at `audio_clock_now`.
///
/// Start times are computed from the number of beats elapsed since the start
/// of the voice rather than by summing durations in seconds, so rounding
/// errors do not accumulate over long songs. A tone never extends past the
/// time the next event starts. Rests produce no tones but delay the tones
/// that follow.
///
/// Fails with [`Error::InvalidVoice`] if the voice does not exist or has no events.
pub fn schedule(song: &Song, voice: &str, audio_clock_now: f64) -> Result<Schedule, Error> {
    let part = song
        .part(voice)
        .filter(|part| part.is_playable())
        .ok_or_else(|| Error::InvalidVoice(voice.to_string()))?;

    let beat_duration = song.beat_duration();
    let mut elapsed_beats = 0.0_f64;
    let mut tones = Vec::with_capacity(part.events().len());

    for event in part.events() {
        let start_time = audio_clock_now + elapsed_beats * beat_duration;
        elapsed_beats += event.duration_beats;
        if let Pitch::Note(label) = event.pitch {
            let end_time = audio_clock_now + elapsed_beats * beat_duration;
            tones.push(ScheduledTone {
                frequency: label.frequency(),
                start_time,
                duration: duration_between(start_time, end_time),
            });
        }
    }

    let total_duration = elapsed_beats * beat_duration;
    debug!(
        "scheduled {} tones for voice '{}' of '{}', {} s at {} bpm",
        tones.len(),
        voice,
        song.title(),
        total_duration,
        song.bpm()
    );

    Ok(Schedule {
        tones,
        start_time: audio_clock_now,
        total_duration,
    })
}

/// The largest duration for which `start_time + duration` does not exceed `end_time`.
fn duration_between(start_time: f64, end_time: f64) -> f64 {
    let mut duration = end_time - start_time;
    // Step down one ulp at a time while rounding overshoots the end
    while duration > 0.0 && start_time + duration > end_time {
        duration = f64::from_bits(duration.to_bits() - 1);
    }
    duration
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{NoteLabel, PitchClass};
    use crate::sequencer::song::NoteEvent;

    fn song_with_voice(bpm: u32, events: Vec<NoteEvent>) -> Song {
        Song::new(
            "test",
            bpm,
            vec![("voice".to_string(), events), ("empty".to_string(), Vec::new())],
        )
        .unwrap()
    }

    fn assert_tone(tone: &ScheduledTone, frequency: f32, start_time: f64, duration: f64) {
        assert!((tone.frequency - frequency).abs() <= 0.01, "{:?}", tone);
        assert!((tone.start_time - start_time).abs() <= 1e-9, "{:?}", tone);
        assert!((tone.duration - duration).abs() <= 1e-9, "{:?}", tone);
    }

    #[test]
    fn test_schedule_with_rest() {
        let json = r#"{"title": "t", "bpm": 60, "parts": {"soprano": [
            { "note": "C4", "duration": 1 },
            { "note": "REST", "duration": 1 },
            { "note": "D4", "duration": 2 }
        ]}}"#;
        let song = Song::from_json(json).unwrap();
        let schedule = schedule(&song, "soprano", 0.0).unwrap();

        assert_eq!(schedule.tones().len(), 2);
        assert_tone(&schedule.tones()[0], 261.63, 0.0, 1.0);
        assert_tone(&schedule.tones()[1], 293.66, 2.0, 2.0);
        assert_eq!(schedule.total_duration(), 4.0);
        assert_eq!(schedule.end_time(), 4.0);
    }

    #[test]
    fn test_schedule_offset_and_tempo() {
        let a4 = NoteLabel::new(PitchClass::A, 4);
        let song = song_with_voice(120, vec![NoteEvent::note(a4, 1.0), NoteEvent::note(a4, 0.5)]);
        let schedule = schedule(&song, "voice", 10.0).unwrap();

        assert_tone(&schedule.tones()[0], 440.0, 10.0, 0.5);
        assert_tone(&schedule.tones()[1], 440.0, 10.5, 0.25);
        assert_eq!(schedule.start_time(), 10.0);
        assert_eq!(schedule.total_duration(), 0.75);
        assert!(!schedule.is_finished(10.7));
        assert!(schedule.is_finished(10.75));
    }

    #[test]
    fn test_invalid_voice() {
        let song = song_with_voice(60, vec![NoteEvent::rest(1.0)]);
        assert!(matches!(
            schedule(&song, "missing", 0.0),
            Err(Error::InvalidVoice(voice)) if voice == "missing"
        ));
        assert!(matches!(
            schedule(&song, "empty", 0.0),
            Err(Error::InvalidVoice(voice)) if voice == "empty"
        ));
    }

    #[test]
    fn test_rests_only() {
        let song = song_with_voice(60, vec![NoteEvent::rest(1.5), NoteEvent::rest(0.5)]);
        let schedule = schedule(&song, "voice", 3.0).unwrap();
        assert!(schedule.tones().is_empty());
        assert_eq!(schedule.total_duration(), 2.0);
    }

    #[test]
    fn test_no_drift_or_overlap() {
        // Many short notes at an awkward tempo
        let mut events = Vec::new();
        for midi_note in 0..1000 {
            let label = NoteLabel::from_midi_note(48 + midi_note % 24);
            let duration_beats = match midi_note % 3 {
                0 => 0.1,
                1 => 1.0 / 3.0,
                _ => 0.25,
            };
            if midi_note % 7 == 0 {
                events.push(NoteEvent::rest(duration_beats));
            } else {
                events.push(NoteEvent::note(label, duration_beats));
            }
        }
        let song = song_with_voice(97, events.clone());
        let start = 1234.5;
        let schedule = schedule(&song, "voice", start).unwrap();

        let beat_count: f64 = events.iter().map(|event| event.duration_beats).sum();
        let expected_total = beat_count * song.beat_duration();
        assert!((schedule.total_duration() - expected_total).abs() <= 1e-9);

        for pair in schedule.tones().windows(2) {
            assert!(pair[0].start_time <= pair[1].start_time);
            assert!(pair[0].end_time() <= pair[1].start_time, "{:?}", pair);
        }
        let last = schedule.tones().last().unwrap();
        assert!(last.end_time() <= schedule.end_time());
        assert!(schedule.tones()[0].start_time >= start);
    }

    #[test]
    fn test_duration_between() {
        // Start times that leave rounding errors in end - start
        for step in 1..2000 {
            let start_time = 0.1 * step as f64;
            for beats in &[0.1, 0.2, 1.0 / 3.0, 0.7] {
                let end_time = start_time + beats * 60.0 / 97.0;
                let duration = duration_between(start_time, end_time);
                assert!(start_time + duration <= end_time);
                assert!((duration - (end_time - start_time)).abs() <= 1e-12);
            }
        }
        assert_eq!(duration_between(1.0, 3.0), 2.0);
        assert_eq!(duration_between(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_tone_ends_where_next_starts() {
        let c4 = NoteLabel::new(PitchClass::C, 4);
        let events = vec![NoteEvent::note(c4, 0.1); 100];
        let song = song_with_voice(60, events);
        let schedule = schedule(&song, "voice", 0.3).unwrap();
        for pair in schedule.tones().windows(2) {
            assert!(pair[0].end_time() <= pair[1].start_time, "{:?}", pair);
            assert!(pair[1].start_time - pair[0].end_time() <= 1e-12);
        }
    }
}
