//! Panels of observations and the balanced-panel aligner.

use crate::error::Error;
use crate::models::{GeoType, Observation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An ordered collection of observations spanning multiple areas.
///
/// Constructed once at load time and treated as immutable; every derived
/// computation returns a new `Panel`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    rows: Vec<Observation>,
}

impl Panel {
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct area names, sorted.
    pub fn areas(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|o| o.area.as_str()).collect()
    }

    pub fn contains_area(&self, name: &str) -> bool {
        self.rows.iter().any(|o| o.area == name)
    }

    /// Geography class of an area, if present.
    pub fn geo_type_of(&self, area: &str) -> Option<GeoType> {
        self.rows.iter().find(|o| o.area == area).map(|o| o.geo_type)
    }

    /// Trim to the date range every geography class can supply
    /// simultaneously: start = max over per-type minimum dates, end = min
    /// over per-type maximums. Rows before `year_floor` are dropped
    /// afterwards. Fails with [`Error::DataGap`] when the panel is empty or
    /// the per-type ranges do not intersect.
    pub fn align(&self, year_floor: Option<i32>) -> Result<Panel, Error> {
        let mut spans: BTreeMap<GeoType, (NaiveDate, NaiveDate)> = BTreeMap::new();
        for o in &self.rows {
            spans
                .entry(o.geo_type)
                .and_modify(|(lo, hi)| {
                    if o.date < *lo {
                        *lo = o.date;
                    }
                    if o.date > *hi {
                        *hi = o.date;
                    }
                })
                .or_insert((o.date, o.date));
        }
        let start = spans
            .values()
            .map(|(lo, _)| *lo)
            .max()
            .ok_or_else(|| Error::DataGap("empty panel".to_string()))?;
        let end = spans
            .values()
            .map(|(_, hi)| *hi)
            .min()
            .ok_or_else(|| Error::DataGap("empty panel".to_string()))?;
        if start > end {
            return Err(Error::DataGap(format!(
                "geography types only cover disjoint ranges (start {} after end {})",
                start, end
            )));
        }
        log::debug!("balanced panel range: {} to {}", start, end);
        let rows = self
            .rows
            .iter()
            .filter(|o| o.date >= start && o.date <= end)
            .filter(|o| year_floor.is_none_or(|floor| o.year >= floor))
            .cloned()
            .collect();
        Ok(Panel::new(rows))
    }

    /// Subset to the given areas, preserving row order.
    pub fn select_areas(&self, names: &[&str]) -> Panel {
        let rows = self
            .rows
            .iter()
            .filter(|o| names.contains(&o.area.as_str()))
            .cloned()
            .collect();
        Panel::new(rows)
    }

    /// Inclusive (min, max) year over all rows.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.rows.iter().map(|o| o.year).min()?;
        let max = self.rows.iter().map(|o| o.year).max()?;
        Some((min, max))
    }
}
