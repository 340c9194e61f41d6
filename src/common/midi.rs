use micromath::F32Ext;

/// The MIDI note number of A4.
pub const A4_MIDI_NOTE: i32 = 69;
/// The frequency of A4 in Hz.
pub const A4_FREQUENCY: f32 = 440.0;

/// Converts a frequency in Hz to a [MIDI](https://en.wikipedia.org/wiki/MIDI) note number (with a fractional part).
pub fn freq_to_midi_note(freq: f32) -> f32 {
    12.0 * F32Ext::log2(freq) - 36.376316562295926
}

/// Converts a MIDI note number to its equal tempered frequency in Hz.
/// Returns exactly 440 for A4.
pub fn midi_note_to_freq(note: i32) -> f32 {
    A4_FREQUENCY * ((note - A4_MIDI_NOTE) as f32 / 12.0).exp2()
}
