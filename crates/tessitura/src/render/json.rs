use super::{Panel, Renderer};
use crate::report::Summary;
use crate::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Writes the panels, layout data included, as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    pub output_dir: PathBuf,
    pub stem: String,
}

#[derive(Serialize)]
struct Document<'a> {
    title: &'a str,
    summary: &'a Summary,
    panels: &'a [Panel],
}

impl JsonRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            stem: stem.into(),
        }
    }

    pub fn to_json(title: &str, panels: &[Panel], summary: &Summary) -> Result<String> {
        serde_json::to_string_pretty(&Document {
            title,
            summary,
            panels,
        })
        .map_err(|e| Error::Render(e.to_string()))
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, title: &str, panels: &[Panel], summary: &Summary) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.json", self.stem));
        let json = Self::to_json(title, panels, summary)?;
        std::fs::write(&path, json).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NamedEntity, Report, VoiceRangeCatalog};

    #[test]
    fn document_carries_layout_and_summary() {
        let report = Report::build(
            vec![NamedEntity::new("Alto", vec![60, 62, 62])],
            VoiceRangeCatalog::standard(),
        );
        let json = JsonRenderer::to_json("t", report.panels(), &report.summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "t");
        assert_eq!(value["summary"]["total"], 3);
        assert_eq!(value["panels"][0]["voice_part"], "Alto");
        assert_eq!(value["panels"][0]["layout"]["domain"][0], 52);
        assert_eq!(value["panels"][0]["layout"]["bands"][1]["category"], "comfortable");
        assert_eq!(value["panels"][0]["histogram"]["counts"]["62"], 2);
    }

    #[test]
    fn writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report::build(vec![NamedEntity::new("x", vec![50])], VoiceRangeCatalog::standard());
        let renderer = JsonRenderer::new(dir.path(), "piece");

        let path = report.render(&renderer, "t").unwrap().unwrap();
        assert_eq!(path, dir.path().join("piece.json"));
        assert!(std::fs::read_to_string(path).unwrap().contains("\"title\": \"t\""));
    }
}
