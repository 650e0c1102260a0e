//! Axis bounds, ticks and shaded voice-range bands for one histogram panel.

use crate::catalog::VoiceRangeBands;
use crate::histogram::PitchHistogram;
use crate::pitch::note_name;
use serde::{Deserialize, Serialize};

/// Padding around the domain when range bands are drawn.
pub const BAND_MARGIN: f64 = 2.0;

/// Padding around the domain without bands; just enough to keep bar edges visible.
pub const PLAIN_MARGIN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandCategory {
    Lower,
    Comfortable,
    Upper,
}

impl BandCategory {
    /// Fill colour used by the renderers.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Lower | Self::Upper => "orange",
            Self::Comfortable => "green",
        }
    }
}

/// A filled x-range `[start, end)`. `end` is the band's last pitch plus one so
/// neighbouring bands abut without a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandShade {
    pub start: f64,
    pub end: f64,
    pub category: BandCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub position: u8,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub x_min: f64,
    pub x_max: f64,
    /// Inclusive pitch domain the axis covers before margins.
    pub domain: (u8, u8),
    pub ticks: Vec<Tick>,
    /// Lower, comfortable, upper; empty when the entity has no known range.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bands: Vec<BandShade>,
}

impl LayoutSpec {
    pub fn compute(histogram: &PitchHistogram, bands: Option<&VoiceRangeBands>) -> Self {
        let (data_min, data_max) = (histogram.min_pitch(), histogram.max_pitch());

        let (domain, margin) = match bands {
            Some(b) => {
                let (lo, hi) = b.span();
                ((data_min.min(lo), data_max.max(hi)), BAND_MARGIN)
            }
            None => ((data_min, data_max), PLAIN_MARGIN),
        };

        let ticks = tick_positions(domain.0, domain.1)
            .into_iter()
            .map(|position| Tick {
                position,
                label: note_name(position),
            })
            .collect();

        Self {
            x_min: domain.0 as f64 - margin,
            x_max: domain.1 as f64 + margin,
            domain,
            ticks,
            bands: bands.map(band_shades).unwrap_or_default(),
        }
    }

    pub fn has_bands(&self) -> bool {
        !self.bands.is_empty()
    }
}

/// Every C (multiple of 12) in `[min, max]`, or just the endpoints when none fall inside.
pub fn tick_positions(min: u8, max: u8) -> Vec<u8> {
    let octaves: Vec<u8> = (min..=max).filter(|p| p % 12 == 0).collect();
    if !octaves.is_empty() {
        return octaves;
    }
    if min == max {
        vec![min]
    } else {
        vec![min, max]
    }
}

fn band_shades(bands: &VoiceRangeBands) -> Vec<BandShade> {
    [
        (bands.lower, BandCategory::Lower),
        (bands.comfortable, BandCategory::Comfortable),
        (bands.upper, BandCategory::Upper),
    ]
    .into_iter()
    .map(|((lo, hi), category)| BandShade {
        start: lo as f64,
        end: hi as f64 + 1.0,
        category,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VoiceRangeCatalog;
    use pretty_assertions::assert_eq;

    fn tenor() -> VoiceRangeBands {
        VoiceRangeCatalog::standard().get("Tenor").unwrap().bands
    }

    #[test]
    fn ticks_on_octave_boundaries() {
        assert_eq!(tick_positions(45, 67), vec![48, 60]);
        assert_eq!(tick_positions(36, 72), vec![36, 48, 60, 72]);
    }

    #[test]
    fn ticks_fall_back_to_endpoints() {
        assert_eq!(tick_positions(61, 63), vec![61, 63]);
        assert_eq!(tick_positions(62, 62), vec![62]);
    }

    #[test]
    fn bands_extend_domain() {
        let hist = PitchHistogram::from_pitches(&[58, 62, 70]).unwrap();
        let layout = LayoutSpec::compute(&hist, Some(&tenor()));

        assert_eq!(layout.domain, (45, 72));
        assert_eq!(layout.x_min, 43.0);
        assert_eq!(layout.x_max, 74.0);
        assert_eq!(
            layout.ticks.iter().map(|t| t.position).collect::<Vec<_>>(),
            vec![48, 60, 72]
        );
    }

    #[test]
    fn data_outside_bands_still_covered() {
        let hist = PitchHistogram::from_pitches(&[40, 76]).unwrap();
        let layout = LayoutSpec::compute(&hist, Some(&tenor()));
        assert_eq!(layout.domain, (40, 76));
    }

    #[test]
    fn plain_layout_uses_half_unit_margin() {
        let hist = PitchHistogram::from_pitches(&[61, 62, 63]).unwrap();
        let layout = LayoutSpec::compute(&hist, None);

        assert_eq!(layout.domain, (61, 63));
        assert_eq!(layout.x_min, 60.5);
        assert_eq!(layout.x_max, 63.5);
        assert!(!layout.has_bands());
        assert_eq!(
            layout.ticks,
            vec![
                Tick { position: 61, label: "C♯/D♭4".into() },
                Tick { position: 63, label: "D♯/E♭4".into() },
            ]
        );
    }

    #[test]
    fn band_shades_abut() {
        let hist = PitchHistogram::from_pitches(&[60]).unwrap();
        let layout = LayoutSpec::compute(&hist, Some(&tenor()));

        assert_eq!(
            layout.bands,
            vec![
                BandShade { start: 45.0, end: 49.0, category: BandCategory::Lower },
                BandShade { start: 49.0, end: 67.0, category: BandCategory::Comfortable },
                BandShade { start: 67.0, end: 73.0, category: BandCategory::Upper },
            ]
        );
        for pair in layout.bands.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn tick_labels_use_note_names() {
        let hist = PitchHistogram::from_pitches(&[55, 60, 69]).unwrap();
        let layout = LayoutSpec::compute(&hist, None);
        assert_eq!(layout.ticks, vec![Tick { position: 60, label: "C4".into() }]);
    }
}
