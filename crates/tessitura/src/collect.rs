//! Grouping extracted pitches into named entities.

use crate::decode::Decoder;
use crate::event::{extract_pitches, SubStream};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A named pitch sequence: one histogram panel's worth of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    display_name: String,
    pitches: Vec<u8>,
}

impl NamedEntity {
    pub fn new(display_name: impl Into<String>, pitches: Vec<u8>) -> Self {
        Self {
            display_name: display_name.into(),
            pitches,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }
}

/// A source excluded from a batch because it could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub entities: Vec<NamedEntity>,
    pub failures: Vec<SourceFailure>,
}

impl Collection {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Entity grouping policy, chosen by input shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collector {
    /// One source; every sub-stream with notes is its own entity.
    /// A decode failure is fatal.
    PerSubStream { source: PathBuf },
    /// Many sources; each is merged into one entity. Decode failures are
    /// recorded and skipped.
    PerSource { sources: Vec<PathBuf> },
}

impl Collector {
    pub fn collect<D: Decoder + ?Sized>(&self, decoder: &D) -> Result<Collection> {
        match self {
            Self::PerSubStream { source } => {
                let sub_streams = decoder.decode(source)?;
                Ok(Collection {
                    entities: entities_from_sub_streams(&sub_streams),
                    failures: Vec::new(),
                })
            }
            Self::PerSource { sources } => Ok(collect_sources(decoder, sources)),
        }
    }
}

/// One entity per sub-stream that yields at least one sounding pitch.
pub fn entities_from_sub_streams(sub_streams: &[SubStream]) -> Vec<NamedEntity> {
    sub_streams
        .iter()
        .enumerate()
        .filter_map(|(index, stream)| {
            let pitches = stream.pitches();
            if pitches.is_empty() {
                return None;
            }

            let name = match stream.label.as_deref().map(str::trim) {
                Some(label) if !label.is_empty() => label.to_string(),
                _ => format!("Stream {}", index),
            };
            debug!(name = %name, notes = pitches.len(), "collected sub-stream");
            Some(NamedEntity::new(name, pitches))
        })
        .collect()
}

/// All sub-streams of one source concatenated in order, or `None` when silent.
pub fn entity_from_source(path: &Path, sub_streams: &[SubStream]) -> Option<NamedEntity> {
    let pitches: Vec<u8> = sub_streams
        .iter()
        .flat_map(|stream| extract_pitches(&stream.events))
        .collect();

    if pitches.is_empty() {
        return None;
    }
    Some(NamedEntity::new(source_display_name(path), pitches))
}

/// Last hyphen-separated token of the file stem: `choir-alto-2.mid` → `2`.
/// A stem ending in a hyphen (or hyphen and whitespace) keeps the whole stem.
pub fn source_display_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match stem.rsplit('-').next() {
        Some(token) if !token.trim().is_empty() => token.to_string(),
        _ => stem,
    }
}

fn collect_sources<D: Decoder + ?Sized>(decoder: &D, sources: &[PathBuf]) -> Collection {
    let mut ordered: Vec<&PathBuf> = sources.iter().collect();
    ordered.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

    let mut collection = Collection::default();
    for path in ordered {
        match decoder.decode(path) {
            Ok(sub_streams) => match entity_from_source(path, &sub_streams) {
                Some(entity) => {
                    debug!(
                        path = %path.display(),
                        name = entity.display_name(),
                        notes = entity.pitches().len(),
                        "collected source"
                    );
                    collection.entities.push(entity);
                }
                None => debug!(path = %path.display(), "source has no sounding notes, skipped"),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping undecodable source");
                collection.failures.push(SourceFailure {
                    path: path.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
    collection
}
