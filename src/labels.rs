//! Collision-free placement of the three end-of-series chart labels.
//!
//! The nation, state, and metro series frequently converge or cross near
//! the final period, so raw latest values would stack their labels on top
//! of each other. Placement ranks the three values, pushes neighbors apart
//! to a kind-specific minimum gap, clamps the stack under the plotted
//! maximum, then layers user-controlled nudges on top.

use std::collections::BTreeMap;

/// Chart families with distinct spacing constants and value formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Percentage series (unemployment rate).
    Rate,
    /// Annual growth index (start year = 100).
    Index,
    /// Monthly growth index; tighter gap for the narrower value range.
    MonthlyIndex,
    /// Level series with a large spread (real GDP).
    Level,
    /// Per-capita income levels, charted in thousands of dollars.
    PerCapitaLevel,
}

impl LabelKind {
    /// Minimum vertical gap enforced between adjacent labels, in chart
    /// units.
    pub fn min_gap(self) -> f64 {
        match self {
            LabelKind::Rate => 0.5,
            LabelKind::Index => 4.5,
            LabelKind::MonthlyIndex => 2.0,
            LabelKind::Level => 8.0,
            LabelKind::PerCapitaLevel => 5.0,
        }
    }

    /// Factor applied to the gap shortfall when pushing labels apart.
    /// Level charts overshoot slightly for visual clarity.
    pub fn amplification(self) -> f64 {
        match self {
            LabelKind::Rate | LabelKind::Index | LabelKind::MonthlyIndex => 1.0,
            LabelKind::Level | LabelKind::PerCapitaLevel => 1.2,
        }
    }

    /// Render a latest value for the label text. Growth-index labels carry
    /// the area's CAGR when available.
    pub fn format_value(self, value: f64, cagr: Option<f64>) -> String {
        match self {
            LabelKind::Rate => format!("{:.1}%", value),
            LabelKind::Index | LabelKind::MonthlyIndex | LabelKind::Level => match cagr {
                Some(c) => format!("{:.1} (CAGR={}%)", value, trim_decimal(c)),
                None => format!("{:.1}", value),
            },
            LabelKind::PerCapitaLevel => format!("{:.1}", value),
        }
    }
}

/// Format with up to 2 decimals, trimming trailing zeros and the dot.
fn trim_decimal(v: f64) -> String {
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// A user-controlled vertical nudge for one label: an up/down toggle
/// combined with a magnitude slider (0–5 in 0.5 steps on the dashboard).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub upward: bool,
    pub magnitude: f64,
}

impl Offset {
    pub fn new(upward: bool, magnitude: f64) -> Self {
        Self { upward, magnitude }
    }

    /// Signed displacement: the direction toggle flips the slider's sign.
    pub fn signed(&self) -> f64 {
        if self.upward {
            self.magnitude
        } else {
            -self.magnitude
        }
    }

    /// From an already-signed displacement.
    pub fn from_signed(v: f64) -> Self {
        Self {
            upward: v >= 0.0,
            magnitude: v.abs(),
        }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self {
            upward: true,
            magnitude: 0.0,
        }
    }
}

/// Nudges for the three comparison geographies.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TripleOffsets {
    pub nation: Offset,
    pub state: Offset,
    pub metro: Offset,
}

/// Compute final label y-coordinates for exactly three geographies.
///
/// 1. Rank descending by raw latest value (name order breaks ties).
/// 2. If the rank-1/rank-2 gap is under the kind's minimum, push rank-1 up
///    by the shortfall times the amplification factor; likewise push
///    rank-3 down for the rank-2/rank-3 gap. Rank-2 never moves.
/// 3. If rank-1 now sits above `series_max`, shift all three down by the
///    overflow, preserving spacing.
/// 4. Add each geography's signed manual offset (may reintroduce overlap
///    by user choice).
///
/// Degenerate inputs (all values equal) go through the same push/clamp
/// path; no input panics.
pub fn place_labels(
    latest: [(&str, f64); 3],
    kind: LabelKind,
    series_max: f64,
    offsets: &BTreeMap<String, Offset>,
) -> BTreeMap<String, f64> {
    let mut ranked = latest;
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(b.0)));

    let min_gap = kind.min_gap();
    let amplification = kind.amplification();

    let top_gap = ranked[0].1 - ranked[1].1;
    if top_gap < min_gap {
        ranked[0].1 += (min_gap - top_gap) * amplification;
    }
    let bottom_gap = ranked[1].1 - ranked[2].1;
    if bottom_gap < min_gap {
        ranked[2].1 -= (min_gap - bottom_gap) * amplification;
    }

    let overflow = ranked[0].1 - series_max;
    if overflow > 0.0 {
        for slot in &mut ranked {
            slot.1 -= overflow;
        }
    }

    ranked
        .into_iter()
        .map(|(name, y)| {
            let nudge = offsets.get(name).map(|o| o.signed()).unwrap_or(0.0);
            (name.to_string(), y + nudge)
        })
        .collect()
}
