use serde::Serialize;
use std::collections::BTreeMap;

/// Occurrence count per pitch. Never empty; keys iterate in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PitchHistogram {
    counts: BTreeMap<u8, usize>,
}

impl PitchHistogram {
    /// Count pitch occurrences. Returns `None` for an empty pitch list.
    pub fn from_pitches(pitches: &[u8]) -> Option<Self> {
        if pitches.is_empty() {
            return None;
        }

        let mut counts = BTreeMap::new();
        for &pitch in pitches {
            *counts.entry(pitch).or_insert(0) += 1;
        }
        Some(Self { counts })
    }

    pub fn min_pitch(&self) -> u8 {
        self.counts.keys().next().copied().unwrap_or_default()
    }

    pub fn max_pitch(&self) -> u8 {
        self.counts.keys().next_back().copied().unwrap_or_default()
    }

    pub fn count(&self, pitch: u8) -> usize {
        self.counts.get(&pitch).copied().unwrap_or(0)
    }

    /// Tallest bar.
    pub fn peak(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// `(pitch, count)` pairs in ascending pitch order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&pitch, &count)| (pitch, count))
    }
}
