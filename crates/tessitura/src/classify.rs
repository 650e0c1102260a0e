//! Display-name → voice-part matching.
//!
//! Matching is case-insensitive substring search in two passes: catalog part
//! names first, then aliases. Within a pass the longest matching key wins, so
//! "Alto 2" beats "Alto" and "Mezzo-soprano" beats "Soprano"; equal-length
//! matches go to whichever entry was declared first.

use crate::catalog::{VoicePart, VoiceRangeCatalog};
use serde::Serialize;

/// How a display name was tied to a catalog part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum Classification<'a> {
    Part { part: &'a VoicePart },
    Alias { alias: &'a str, part: &'a VoicePart },
}

impl<'a> Classification<'a> {
    pub fn part(&self) -> &'a VoicePart {
        match *self {
            Self::Part { part } | Self::Alias { part, .. } => part,
        }
    }
}

/// Resolve a display name against the catalog. `None` means no known range.
pub fn classify<'a>(catalog: &'a VoiceRangeCatalog, display_name: &str) -> Option<Classification<'a>> {
    let name = display_name.to_lowercase();

    let direct = longest_match(
        catalog.parts().iter(),
        |part: &VoicePart| part.name.to_lowercase(),
        &name,
    );
    if let Some(part) = direct {
        return Some(Classification::Part { part });
    }

    let (alias, target) = longest_match(
        catalog.aliases().iter(),
        |(alias, _): &(String, String)| alias.clone(),
        &name,
    )?;
    // Aliases are validated against the catalog on insertion
    catalog.get(target).map(|part| Classification::Alias {
        alias: alias.as_str(),
        part,
    })
}

fn longest_match<'a, T, I, K>(candidates: I, key: K, haystack: &str) -> Option<&'a T>
where
    I: Iterator<Item = &'a T>,
    K: Fn(&T) -> String,
    T: 'a,
{
    let mut best: Option<(usize, &'a T)> = None;
    for candidate in candidates {
        let k = key(candidate);
        if k.is_empty() || !haystack.contains(&k) {
            continue;
        }
        // Strictly longer replaces, so ties keep the earlier entry
        if best.map_or(true, |(len, _)| k.chars().count() > len) {
            best = Some((k.chars().count(), candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}
