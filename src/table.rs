//! Wide year-by-geography comparison tables with unit-aware formatting.

use crate::error::Error;
use crate::geo::{GeographyTriple, metro_label};
use crate::panel::Panel;
use anyhow::Result;
use csv::WriterBuilder;
use num_format::{Locale, ToFormattedString};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;

/// How to render a metric's values as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// One-decimal percentage (without the `%` sign, as on the dashboard).
    Percentage,
    /// Thousands-separated integer.
    Thousands,
    /// Plain number, trailing zeros trimmed.
    Raw,
}

impl TableFormat {
    fn render(self, v: f64) -> String {
        match self {
            TableFormat::Percentage => format!("{:.1}", v),
            // The separator locale is fixed so output never drifts with the
            // process environment.
            TableFormat::Thousands => (v.round() as i64).to_formatted_string(&Locale::en),
            TableFormat::Raw => {
                let s = format!("{:.4}", v);
                s.trim_end_matches('0').trim_end_matches('.').to_string()
            }
        }
    }
}

/// A rendered table: fixed columns `[Year, nation, state, metro]`, one row
/// per year, all cells already formatted as strings.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WideTable {
    pub fn write_csv<W: Write>(&self, w: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_writer(w);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv(std::fs::File::create(path)?)
    }
}

/// Pivot the three comparison geographies into a wide year-indexed table:
/// per geography, average `variable` by year, then format. Years are the
/// union across the three; a year missing for one geography leaves that
/// cell empty rather than dropping the row.
pub fn format_table(
    panel: &Panel,
    triple: &GeographyTriple,
    variable: &str,
    format: TableFormat,
) -> Result<WideTable, Error> {
    let geo_type = panel
        .geo_type_of(&triple.metro)
        .ok_or_else(|| Error::UnknownGeography(triple.metro.clone()))?;
    let names = triple.names();

    let mut per_geo: [BTreeMap<i32, (f64, u32)>; 3] = Default::default();
    for o in panel.rows() {
        if let Some(slot) = names.iter().position(|n| *n == o.area)
            && let Some(v) = o.value(variable)
        {
            let cell = per_geo[slot].entry(o.year).or_insert((0.0, 0));
            cell.0 += v;
            cell.1 += 1;
        }
    }

    let years: BTreeSet<i32> = per_geo.iter().flat_map(|m| m.keys().copied()).collect();
    let rows = years
        .into_iter()
        .map(|year| {
            let mut row = vec![year.to_string()];
            for geo in &per_geo {
                row.push(match geo.get(&year) {
                    Some((sum, n)) => format.render(sum / *n as f64),
                    None => String::new(),
                });
            }
            row
        })
        .collect();

    Ok(WideTable {
        columns: vec![
            "Year".to_string(),
            triple.nation.clone(),
            triple.state.clone(),
            metro_label(&triple.metro, geo_type),
        ],
        rows,
    })
}
