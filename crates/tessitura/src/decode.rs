//! Source decoding: MIDI files into sub-streams of raw events.

use crate::event::{RawEvent, SubStream};
use crate::{Error, Result};
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use std::path::Path;
use tracing::debug;

/// Turns a source file into its ordered sub-streams.
pub trait Decoder {
    fn decode(&self, path: &Path) -> Result<Vec<SubStream>>;
}

/// Standard MIDI File decoder backed by midly. Each track is one sub-stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidiDecoder;

impl Decoder for MidiDecoder {
    fn decode(&self, path: &Path) -> Result<Vec<SubStream>> {
        let bytes = std::fs::read(path).map_err(|e| Error::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let sub_streams = parse_smf(&bytes).map_err(|message| Error::Decode {
            path: path.to_path_buf(),
            message,
        })?;

        debug!(
            path = %path.display(),
            tracks = sub_streams.len(),
            "decoded MIDI source"
        );
        Ok(sub_streams)
    }
}

/// Decode in-memory SMF bytes.
pub fn decode_bytes(bytes: &[u8]) -> Result<Vec<SubStream>> {
    parse_smf(bytes).map_err(|message| Error::Decode {
        path: "<memory>".into(),
        message,
    })
}

fn parse_smf(bytes: &[u8]) -> std::result::Result<Vec<SubStream>, String> {
    let smf = Smf::parse(bytes).map_err(|e| e.to_string())?;

    Ok(smf
        .tracks
        .iter()
        .map(|track| {
            let mut label = None;
            let mut events = Vec::with_capacity(track.len());

            for event in track {
                match event.kind {
                    TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                        // First name wins; some exporters repeat it per channel
                        if label.is_none() {
                            label = Some(String::from_utf8_lossy(name).into_owned());
                        }
                        events.push(RawEvent::other());
                    }
                    TrackEventKind::Midi { message, .. } => events.push(convert_message(message)),
                    _ => events.push(RawEvent::other()),
                }
            }

            SubStream::new(label, events)
        })
        .collect())
}

fn convert_message(message: MidiMessage) -> RawEvent {
    match message {
        MidiMessage::NoteOn { key, vel } => RawEvent::note_on(key.as_int(), vel.as_int()),
        MidiMessage::NoteOff { key, .. } => RawEvent::note_off(key.as_int()),
        _ => RawEvent::other(),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::smf_bytes;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tracks_become_labelled_sub_streams() {
        let bytes = smf_bytes(&[
            (Some("Conductor"), &[]),
            (Some("Alto 2"), &[(57, 90), (60, 0), (62, 90)]),
            (None, &[(48, 70)]),
        ]);

        let streams = decode_bytes(&bytes).unwrap();
        assert_eq!(streams.len(), 3);
        assert_eq!(streams[0].label.as_deref(), Some("Conductor"));
        assert!(streams[0].pitches().is_empty());
        assert_eq!(streams[1].label.as_deref(), Some("Alto 2"));
        assert_eq!(streams[1].pitches(), vec![57, 62]);
        assert_eq!(streams[2].label, None);
        assert_eq!(streams[2].pitches(), vec![48]);
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let err = decode_bytes(b"definitely not midi").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.mid");

        match MidiDecoder.decode(&path) {
            Err(Error::Decode { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn decodes_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mid");
        std::fs::write(&path, smf_bytes(&[(Some("Tenor"), &[(55, 64), (57, 64)])])).unwrap();

        let streams = MidiDecoder.decode(&path).unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].pitches(), vec![55, 57]);
    }
}
