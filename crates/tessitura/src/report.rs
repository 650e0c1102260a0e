//! Drives entities through histogram, classification and layout, and
//! produces the plain-text note-count summary.

use crate::catalog::VoiceRangeCatalog;
use crate::classify::classify;
use crate::collect::NamedEntity;
use crate::histogram::PitchHistogram;
use crate::layout::LayoutSpec;
use crate::render::{Panel, Renderer};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

pub const NO_DATA_MESSAGE: &str = "No note-on events found.";

/// Per-entity note counts in entity order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub counts: Vec<(String, usize)>,
    pub total: usize,
}

impl Summary {
    pub fn from_entities(entities: &[NamedEntity]) -> Self {
        let counts: Vec<(String, usize)> = entities
            .iter()
            .map(|e| (e.display_name().to_string(), e.pitches().len()))
            .collect();
        let total = counts.iter().map(|(_, n)| n).sum();
        Self { counts, total }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, count) in &self.counts {
            writeln!(f, "{}: {}", name, count)?;
        }
        write!(f, "Total: {}", self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "panels", rename_all = "snake_case")]
pub enum Outcome {
    /// Nothing sounded; no layout or rendering happens.
    NoData,
    Panels(Vec<Panel>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub outcome: Outcome,
}

impl Report {
    pub fn build(entities: Vec<NamedEntity>, catalog: &VoiceRangeCatalog) -> Self {
        let summary = Summary::from_entities(&entities);

        let panels: Vec<Panel> = entities
            .iter()
            .filter_map(|entity| build_panel(entity, catalog))
            .collect();

        let outcome = if panels.is_empty() {
            Outcome::NoData
        } else {
            Outcome::Panels(panels)
        };

        Self { summary, outcome }
    }

    pub fn panels(&self) -> &[Panel] {
        match &self.outcome {
            Outcome::NoData => &[],
            Outcome::Panels(panels) => panels,
        }
    }

    pub fn has_data(&self) -> bool {
        matches!(self.outcome, Outcome::Panels(_))
    }

    /// Hand the panels to a renderer. Returns `None` without calling it when there is no data.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &R, title: &str) -> Result<Option<PathBuf>> {
        match &self.outcome {
            Outcome::NoData => Ok(None),
            Outcome::Panels(panels) => renderer.render(title, panels, &self.summary).map(Some),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::NoData => f.write_str(NO_DATA_MESSAGE),
            Outcome::Panels(_) => fmt::Display::fmt(&self.summary, f),
        }
    }
}

fn build_panel(entity: &NamedEntity, catalog: &VoiceRangeCatalog) -> Option<Panel> {
    let histogram = PitchHistogram::from_pitches(entity.pitches())?;
    let part = classify(catalog, entity.display_name()).map(|c| c.part());
    let layout = LayoutSpec::compute(&histogram, part.map(|p| &p.bands));

    debug!(
        name = entity.display_name(),
        voice_part = part.map(|p| p.name.as_str()).unwrap_or("-"),
        low = layout.domain.0,
        high = layout.domain.1,
        "laid out panel"
    );

    Some(Panel {
        display_name: entity.display_name().to_string(),
        voice_part: part.map(|p| p.name.clone()),
        histogram,
        layout,
    })
}
