//! Input path resolution: a single MIDI file or a directory batch.

use crate::collect::Collector;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_EXTENSIONS: &[&str] = &["mid", "midi"];

/// A resolved input path and the grouping it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub path: PathBuf,
    pub collector: Collector,
}

impl Input {
    /// Directory → per-source batch over matching files; file → per-sub-stream.
    pub fn resolve(path: &Path, extensions: &[String]) -> Result<Self> {
        if !path.exists() {
            return Err(Error::InputPath {
                path: path.to_path_buf(),
                reason: "no such file or directory".to_string(),
            });
        }

        let collector = if path.is_dir() {
            Collector::PerSource {
                sources: scan_directory(path, extensions)?,
            }
        } else {
            Collector::PerSubStream {
                source: path.to_path_buf(),
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            collector,
        })
    }

    pub fn is_batch(&self) -> bool {
        matches!(self.collector, Collector::PerSource { .. })
    }

    /// Figure title naming the input.
    pub fn title(&self) -> String {
        format!("Note Occurrence Histograms for '{}'", self.path.display())
    }

    /// File stem for saved figures.
    pub fn output_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "histograms".to_string())
    }
}

/// Immediate children of `dir` with a matching extension (case-insensitive), sorted by name.
pub fn scan_directory(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::InputPath {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
