use serde::{Deserialize, Serialize};

/// Kind of a raw stream event, as far as pitch extraction cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NoteOn,
    NoteOff,
    Other,
}

/// A single decoded event. Pitch and intensity are only meaningful for note events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub kind: EventKind,
    pub pitch: Option<u8>,
    pub intensity: Option<u8>,
}

impl RawEvent {
    pub fn note_on(pitch: u8, intensity: u8) -> Self {
        Self {
            kind: EventKind::NoteOn,
            pitch: Some(pitch),
            intensity: Some(intensity),
        }
    }

    pub fn note_off(pitch: u8) -> Self {
        Self {
            kind: EventKind::NoteOff,
            pitch: Some(pitch),
            intensity: Some(0),
        }
    }

    pub fn other() -> Self {
        Self {
            kind: EventKind::Other,
            pitch: None,
            intensity: None,
        }
    }

    /// The pitch this event starts sounding, if any.
    ///
    /// A note-on with zero velocity is a note-off by convention.
    pub fn sounding_pitch(&self) -> Option<u8> {
        match (self.kind, self.pitch, self.intensity) {
            (EventKind::NoteOn, Some(pitch), Some(intensity)) if intensity > 0 => Some(pitch),
            _ => None,
        }
    }
}

/// An independently named event sequence inside a source (one MIDI track).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubStream {
    pub label: Option<String>,
    pub events: Vec<RawEvent>,
}

impl SubStream {
    pub fn new(label: Option<String>, events: Vec<RawEvent>) -> Self {
        Self { label, events }
    }

    pub fn pitches(&self) -> Vec<u8> {
        extract_pitches(&self.events)
    }
}

/// Pitches of every sounding note-on, in stream order, duplicates kept.
pub fn extract_pitches(events: &[RawEvent]) -> Vec<u8> {
    events.iter().filter_map(RawEvent::sounding_pitch).collect()
}
