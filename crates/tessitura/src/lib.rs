//! Pitch histograms and voice-range classification for MIDI parts.
//!
//! The pipeline runs in one direction:
//!
//! ```text
//! raw events → extracted pitches → named entities → (histogram, voice part) → layout → renderer
//! ```
//!
//! # Example
//!
//! ```no_run
//! use tessitura::{Collector, MidiDecoder, Report, VoiceRangeCatalog};
//!
//! let collector = Collector::PerSubStream { source: "choir.mid".into() };
//! let collection = collector.collect(&MidiDecoder).unwrap();
//! let report = Report::build(collection.entities, VoiceRangeCatalog::standard());
//! println!("{}", report.summary);
//! ```

pub mod catalog;
pub mod classify;
pub mod collect;
pub mod decode;
pub mod event;
pub mod histogram;
pub mod input;
pub mod layout;
pub mod pitch;
pub mod render;
pub mod report;

pub use catalog::{VoicePart, VoiceRangeBands, VoiceRangeCatalog};
pub use classify::{classify, Classification};
pub use collect::{Collection, Collector, NamedEntity, SourceFailure};
pub use decode::{decode_bytes, Decoder, MidiDecoder};
pub use event::{extract_pitches, EventKind, RawEvent, SubStream};
pub use histogram::PitchHistogram;
pub use input::Input;
pub use layout::{BandCategory, BandShade, LayoutSpec, Tick};
pub use pitch::{note_name, octave, pitch_class_name};
pub use render::{FigureGrid, JsonRenderer, Panel, Renderer, SvgRenderer};
pub use report::{Outcome, Report, Summary};

use std::path::PathBuf;

/// Errors from tessitura operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("invalid input path {path}: {reason}")]
    InputPath { path: PathBuf, reason: String },

    #[error("invalid range bands for {part}: {reason}")]
    InvalidBands { part: String, reason: String },

    #[error("alias {alias:?} points at unknown voice part {target:?}")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
