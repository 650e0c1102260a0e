//! Startup catalog: the built-in parts extended with configured ones.

use tessconf::TessConfig;
use tessitura::{VoiceRangeBands, VoiceRangeCatalog};

/// Clone the standard catalog and layer configured parts, then aliases, on top.
pub fn build(config: &TessConfig) -> tessitura::Result<VoiceRangeCatalog> {
    let mut catalog = VoiceRangeCatalog::standard().clone();

    for (name, voice) in &config.voices {
        let bands = VoiceRangeBands::new(name, voice.lower, voice.comfortable, voice.upper)?;
        catalog = catalog.with_part(name, bands);
    }

    // Parts first so aliases may target configured parts
    for (alias, target) in &config.aliases {
        catalog = catalog.with_alias(alias, target)?;
    }

    Ok(catalog)
}
