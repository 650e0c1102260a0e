//! Voice-part tessitura catalog.
//!
//! Each part has three contiguous inclusive bands in MIDI note numbers:
//! a strained lower extension, the comfortable range, and an upper extension.

use crate::{Error, Result};
use serde::Serialize;
use std::sync::OnceLock;

/// Inclusive `(low, high)` MIDI range.
pub type PitchSpan = (u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceRangeBands {
    pub lower: PitchSpan,
    pub comfortable: PitchSpan,
    pub upper: PitchSpan,
}

impl VoiceRangeBands {
    /// Validated constructor: every span ordered, bands ascending and non-overlapping.
    pub fn new(
        part: &str,
        lower: PitchSpan,
        comfortable: PitchSpan,
        upper: PitchSpan,
    ) -> Result<Self> {
        let bands = Self {
            lower,
            comfortable,
            upper,
        };
        bands.validate().map_err(|reason| Error::InvalidBands {
            part: part.to_string(),
            reason,
        })?;
        Ok(bands)
    }

    const fn from_table(lower: PitchSpan, comfortable: PitchSpan, upper: PitchSpan) -> Self {
        Self {
            lower,
            comfortable,
            upper,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        for (label, (lo, hi)) in [
            ("lower", self.lower),
            ("comfortable", self.comfortable),
            ("upper", self.upper),
        ] {
            if lo > hi {
                return Err(format!("{} band starts above its end ({} > {})", label, lo, hi));
            }
            if hi > 127 {
                return Err(format!("{} band ends outside MIDI range ({})", label, hi));
            }
        }
        if self.lower.1 >= self.comfortable.0 {
            return Err("lower band overlaps the comfortable band".to_string());
        }
        if self.comfortable.1 >= self.upper.0 {
            return Err("comfortable band overlaps the upper band".to_string());
        }
        Ok(())
    }

    /// Full usable range, lower start through upper end.
    pub fn span(&self) -> PitchSpan {
        (self.lower.0, self.upper.1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoicePart {
    pub name: String,
    pub bands: VoiceRangeBands,
}

const STANDARD_PARTS: &[(&str, VoiceRangeBands)] = &[
    ("Soprano", VoiceRangeBands::from_table((55, 61), (62, 77), (78, 81))),
    ("Soprano 1", VoiceRangeBands::from_table((60, 61), (62, 79), (80, 81))),
    ("Soprano 2", VoiceRangeBands::from_table((55, 57), (58, 77), (78, 79))),
    ("Mezzo-soprano", VoiceRangeBands::from_table((55, 57), (58, 77), (78, 81))),
    ("Alto", VoiceRangeBands::from_table((52, 56), (57, 74), (75, 79))),
    ("Alto 1", VoiceRangeBands::from_table((55, 56), (57, 76), (77, 79))),
    ("Alto 2", VoiceRangeBands::from_table((52, 53), (54, 74), (75, 77))),
    ("Tenor", VoiceRangeBands::from_table((45, 48), (49, 66), (67, 72))),
    ("Tenor 1", VoiceRangeBands::from_table((47, 48), (49, 67), (68, 72))),
    ("Tenor 2", VoiceRangeBands::from_table((45, 47), (48, 66), (67, 69))),
    ("Baritone", VoiceRangeBands::from_table((41, 44), (45, 64), (65, 67))),
    ("Bass", VoiceRangeBands::from_table((36, 44), (45, 60), (61, 67))),
    ("Bass 1", VoiceRangeBands::from_table((41, 44), (45, 64), (65, 67))),
    ("Bass 2", VoiceRangeBands::from_table((36, 39), (40, 60), (61, 64))),
];

// German and abbreviated part labels common in choral scores.
const STANDARD_ALIASES: &[(&str, &str)] = &[
    ("alt 1", "Alto 1"),
    ("alt 2", "Alto 2"),
    ("sopran 1", "Soprano 1"),
    ("sopran 2", "Soprano 2"),
    ("alt", "Alto"),
    ("sopran", "Soprano"),
    ("bariton", "Baritone"),
    ("mezzo", "Mezzo-soprano"),
];

/// Named voice parts plus lowercase substring aliases onto them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceRangeCatalog {
    parts: Vec<VoicePart>,
    aliases: Vec<(String, String)>,
}

impl VoiceRangeCatalog {
    pub fn empty() -> Self {
        Self {
            parts: Vec::new(),
            aliases: Vec::new(),
        }
    }

    /// The built-in SATB catalog, built once per process.
    pub fn standard() -> &'static VoiceRangeCatalog {
        static STANDARD: OnceLock<VoiceRangeCatalog> = OnceLock::new();
        STANDARD.get_or_init(|| VoiceRangeCatalog {
            parts: STANDARD_PARTS
                .iter()
                .map(|(name, bands)| VoicePart {
                    name: name.to_string(),
                    bands: *bands,
                })
                .collect(),
            aliases: STANDARD_ALIASES
                .iter()
                .map(|(alias, target)| (alias.to_string(), target.to_string()))
                .collect(),
        })
    }

    /// Add a part, or replace the bands of an existing part with the same name.
    pub fn with_part(mut self, name: &str, bands: VoiceRangeBands) -> Self {
        match self.position(name) {
            Some(idx) => self.parts[idx].bands = bands,
            None => self.parts.push(VoicePart {
                name: name.to_string(),
                bands,
            }),
        }
        self
    }

    /// Add or retarget an alias. The target must already be a catalog part.
    pub fn with_alias(mut self, alias: &str, target: &str) -> Result<Self> {
        let Some(idx) = self.position(target) else {
            return Err(Error::UnknownAliasTarget {
                alias: alias.to_string(),
                target: target.to_string(),
            });
        };
        let canonical = self.parts[idx].name.clone();
        let alias = alias.to_lowercase();

        match self.aliases.iter_mut().find(|(a, _)| *a == alias) {
            Some(entry) => entry.1 = canonical,
            None => self.aliases.push((alias, canonical)),
        }
        Ok(self)
    }

    pub fn parts(&self) -> &[VoicePart] {
        &self.parts
    }

    pub fn aliases(&self) -> &[(String, String)] {
        &self.aliases
    }

    /// Exact (case-insensitive) lookup by part name.
    pub fn get(&self, name: &str) -> Option<&VoicePart> {
        self.position(name).map(|idx| &self.parts[idx])
    }

    // Same folding as `classify`
    fn position(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.parts
            .iter()
            .position(|p| p.name.to_lowercase() == name)
    }
}

impl Default for VoiceRangeCatalog {
    fn default() -> Self {
        Self::standard().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bands_are_contiguous_and_ascending() {
        for part in VoiceRangeCatalog::standard().parts() {
            assert!(
                part.bands.validate().is_ok(),
                "{}: {:?}",
                part.name,
                part.bands.validate()
            );
        }
    }

    #[test]
    fn standard_aliases_resolve_to_parts() {
        let catalog = VoiceRangeCatalog::standard();
        for (alias, target) in catalog.aliases() {
            assert!(catalog.get(target).is_some(), "{} → {}", alias, target);
            assert_eq!(*alias, alias.to_lowercase());
        }
    }

    #[test]
    fn rejects_overlapping_bands() {
        let err = VoiceRangeBands::new("Odd", (40, 50), (50, 60), (61, 65)).unwrap_err();
        assert!(matches!(err, Error::InvalidBands { .. }));
        assert!(VoiceRangeBands::new("Odd", (40, 49), (50, 60), (59, 65)).is_err());
    }

    #[test]
    fn rejects_reversed_span() {
        assert!(VoiceRangeBands::new("Odd", (45, 40), (50, 60), (61, 65)).is_err());
    }

    #[test]
    fn with_part_replaces_case_insensitively() {
        let bands = VoiceRangeBands::new("Tenor", (44, 46), (47, 65), (66, 70)).unwrap();
        let catalog = VoiceRangeCatalog::default().with_part("tenor", bands);

        assert_eq!(catalog.parts().len(), STANDARD_PARTS.len());
        assert_eq!(catalog.get("Tenor").unwrap().bands, bands);
    }

    #[test]
    fn lookup_folds_non_ascii_like_classify() {
        let bands = VoiceRangeBands::new("SOPRANÍSSIMO", (62, 64), (65, 84), (85, 88)).unwrap();
        let catalog = VoiceRangeCatalog::empty()
            .with_part("SOPRANÍSSIMO", bands)
            .with_part("sopraníssimo", bands);

        assert_eq!(catalog.parts().len(), 1);
        assert_eq!(catalog.get("Sopraníssimo").unwrap().name, "SOPRANÍSSIMO");

        let catalog = catalog.with_alias("ÍSSIMA", "sopraníssimo").unwrap();
        let found = crate::classify(&catalog, "Sopraníssimo solo").unwrap();
        assert_eq!(found.part().name, "SOPRANÍSSIMO");
        let via_alias = crate::classify(&catalog, "Solo íssima").unwrap();
        assert_eq!(via_alias.part().name, "SOPRANÍSSIMO");
    }

    #[test]
    fn with_alias_requires_known_target() {
        let err = VoiceRangeCatalog::default()
            .with_alias("contratenor", "Countertenor")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownAliasTarget { .. }));

        let catalog = VoiceRangeCatalog::default()
            .with_alias("Tenore", "tenor")
            .unwrap();
        assert!(catalog
            .aliases()
            .contains(&("tenore".to_string(), "Tenor".to_string())));
    }

    #[test]
    fn span_covers_all_three_bands() {
        let bass = VoiceRangeCatalog::standard().get("Bass").unwrap();
        assert_eq!(bass.bands.span(), (36, 67));
    }
}
