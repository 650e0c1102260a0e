//! MIDI note number naming.

/// Pitch-class names, indexed by `pitch % 12`.
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C♯/D♭", "D", "D♯/E♭", "E", "F", "F♯/G♭", "G", "G♯/A♭", "A", "A♯/B♭", "B",
];

pub fn pitch_class_name(pitch: u8) -> &'static str {
    PITCH_CLASS_NAMES[(pitch % 12) as usize]
}

/// Scientific-pitch octave: middle C (60) is octave 4, MIDI 0 is octave -1.
pub fn octave(pitch: u8) -> i8 {
    (pitch / 12) as i8 - 1
}

/// Note name with octave, e.g. 60 → "C4", 69 → "A4".
pub fn note_name(pitch: u8) -> String {
    format!("{}{}", pitch_class_name(pitch), octave(pitch))
}
