use super::{FigureGrid, Panel, Renderer};
use crate::report::Summary;
use crate::{Error, Result};
use std::fmt::Write as _;
use std::path::PathBuf;

const CELL_WIDTH: f64 = 600.0;
const CELL_HEIGHT: f64 = 400.0;
const TITLE_HEIGHT: f64 = 50.0;

// Plot area insets within a cell
const PAD_LEFT: f64 = 60.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 40.0;
const PAD_BOTTOM: f64 = 80.0;

/// Bars start at the pitch and cover this fraction of a semitone.
const BAR_WIDTH: f64 = 0.8;
const BAND_OPACITY: f64 = 0.2;
/// Headroom above the tallest bar.
const Y_HEADROOM: f64 = 1.05;

/// Draws the panel grid as a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub output_dir: PathBuf,
    pub stem: String,
}

impl SvgRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            stem: stem.into(),
        }
    }

    pub fn to_svg(title: &str, panels: &[Panel]) -> String {
        let grid = FigureGrid::for_panels(panels.len());
        let width = grid.cols as f64 * CELL_WIDTH;
        let height = grid.rows as f64 * CELL_HEIGHT + TITLE_HEIGHT;

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = width,
            h = height
        );
        let _ = writeln!(out, r#"<rect width="{}" height="{}" fill="white"/>"#, width, height);
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="14">{}</text>"#,
            width / 2.0,
            TITLE_HEIGHT * 0.6,
            escape(title)
        );

        for (index, panel) in panels.iter().enumerate() {
            let (row, col) = grid.cell(index);
            let origin = (col as f64 * CELL_WIDTH, TITLE_HEIGHT + row as f64 * CELL_HEIGHT);
            draw_panel(&mut out, panel, origin);
        }

        out.push_str("</svg>\n");
        out
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, title: &str, panels: &[Panel], _summary: &Summary) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.svg", self.stem));
        std::fs::write(&path, Self::to_svg(title, panels)).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Maps data coordinates onto one cell's plot area.
struct Axes {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    x_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Axes {
    fn x(&self, value: f64) -> f64 {
        let span = (self.x_max - self.x_min).max(f64::EPSILON);
        self.left + (value - self.x_min) / span * (self.right - self.left)
    }

    fn y(&self, count: f64) -> f64 {
        self.bottom - count / self.y_max * (self.bottom - self.top)
    }

    fn clamp_x(&self, value: f64) -> f64 {
        value.clamp(self.x_min, self.x_max)
    }
}

fn draw_panel(out: &mut String, panel: &Panel, (ox, oy): (f64, f64)) {
    let layout = &panel.layout;
    let peak = panel.histogram.peak().max(1);
    let axes = Axes {
        left: ox + PAD_LEFT,
        right: ox + CELL_WIDTH - PAD_RIGHT,
        top: oy + PAD_TOP,
        bottom: oy + CELL_HEIGHT - PAD_BOTTOM,
        x_min: layout.x_min,
        x_max: layout.x_max,
        y_max: peak as f64 * Y_HEADROOM,
    };

    let _ = writeln!(out, "<g>");
    let _ = writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{}</text>"#,
        (axes.left + axes.right) / 2.0,
        oy + PAD_TOP * 0.6,
        escape(&panel.display_name)
    );

    for band in &layout.bands {
        let x0 = axes.x(axes.clamp_x(band.start));
        let x1 = axes.x(axes.clamp_x(band.end));
        let _ = writeln!(
            out,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{}"/>"#,
            x0,
            axes.top,
            (x1 - x0).max(0.0),
            axes.bottom - axes.top,
            band.category.color(),
            BAND_OPACITY
        );
    }

    for (pitch, count) in panel.histogram.iter() {
        let x0 = axes.x(pitch as f64);
        let x1 = axes.x(pitch as f64 + BAR_WIDTH);
        let top = axes.y(count as f64);
        let _ = writeln!(
            out,
            r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="#1f77b4"/>"##,
            x0,
            top,
            x1 - x0,
            axes.bottom - top
        );
    }

    // Frame
    let _ = writeln!(
        out,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="black"/>"#,
        axes.left,
        axes.top,
        axes.right - axes.left,
        axes.bottom - axes.top
    );

    for tick in &layout.ticks {
        let x = axes.x(tick.position as f64);
        let _ = writeln!(
            out,
            r#"<line x1="{x:.2}" y1="{y:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="black"/>"#,
            x = x,
            y = axes.bottom,
            y2 = axes.bottom + 4.0
        );
        let _ = writeln!(
            out,
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end" font-size="8" transform="rotate(-45 {x:.2} {y:.2})">{label}</text>"#,
            x = x,
            y = axes.bottom + 12.0,
            label = escape(&tick.label)
        );
    }

    for value in y_ticks(peak) {
        let y = axes.y(value as f64);
        let _ = writeln!(
            out,
            r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="black"/>"#,
            x1 = axes.left - 4.0,
            x2 = axes.left,
            y = y
        );
        let _ = writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="end" font-size="8">{}</text>"#,
            axes.left - 6.0,
            y + 3.0,
            value
        );
    }

    let _ = writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="10">Pitch</text>"#,
        (axes.left + axes.right) / 2.0,
        oy + CELL_HEIGHT - 12.0
    );
    let label_x = ox + 16.0;
    let label_y = (axes.top + axes.bottom) / 2.0;
    let _ = writeln!(
        out,
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="10" transform="rotate(-90 {x:.2} {y:.2})">Occurrences</text>"#,
        x = label_x,
        y = label_y
    );
    let _ = writeln!(out, "</g>");
}

/// At most six evenly spaced integer count ticks from zero.
fn y_ticks(peak: usize) -> Vec<usize> {
    let step = peak.div_ceil(5).max(1);
    (0..=peak).step_by(step).collect()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
