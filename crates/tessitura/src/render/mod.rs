//! Figure output. The core hands each renderer a title plus one panel per
//! entity; renderers own the drawing surface and file format.

mod json;
mod svg;

pub use json::JsonRenderer;
pub use svg::SvgRenderer;

use crate::histogram::PitchHistogram;
use crate::layout::LayoutSpec;
use crate::report::Summary;
use crate::Result;
use serde::Serialize;
use std::path::PathBuf;

/// Everything needed to draw one entity's histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub display_name: String,
    pub voice_part: Option<String>,
    pub histogram: PitchHistogram,
    pub layout: LayoutSpec,
}

pub trait Renderer {
    /// Compose and save the figure, returning where it was written.
    fn render(&self, title: &str, panels: &[Panel], summary: &Summary) -> Result<PathBuf>;
}

/// Two-column panel grid; the last cell stays hidden when the panel count is odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureGrid {
    pub rows: usize,
    pub cols: usize,
    pub panels: usize,
}

impl FigureGrid {
    pub const COLUMNS: usize = 2;

    pub fn for_panels(panels: usize) -> Self {
        Self {
            rows: panels.div_ceil(Self::COLUMNS),
            cols: Self::COLUMNS,
            panels,
        }
    }

    /// `(row, col)` of the panel at `index`.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Cells left empty after the last panel.
    pub fn hidden_cells(&self) -> usize {
        self.rows * self.cols - self.panels
    }
}
