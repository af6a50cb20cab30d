//! Read panel datasets from CSV and write derived outputs.

use crate::models::{GeoType, Observation};
use crate::panel::Panel;
use crate::table::WideTable;
use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Parse a panel from CSV. Requires `Area` and `Type` columns plus either
/// `Date` (`%Y-%m-%d`) or `Year`; every other column whose cell parses as
/// a number becomes a metric field, and blank cells are simply absent.
pub fn read_panel<R: Read>(rdr: R) -> Result<Panel> {
    let mut csv = ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let headers = csv.headers().context("read csv header")?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let area_col = position("Area").ok_or_else(|| anyhow!("missing Area column"))?;
    let type_col = position("Type").ok_or_else(|| anyhow!("missing Type column"))?;
    let date_col = position("Date");
    let year_col = position("Year");
    if date_col.is_none() && year_col.is_none() {
        bail!("need a Date or Year column");
    }

    let mut rows = Vec::new();
    for (line, record) in csv.records().enumerate() {
        let record = record.with_context(|| format!("csv record {}", line + 2))?;
        let area = record
            .get(area_col)
            .ok_or_else(|| anyhow!("row {}: missing Area cell", line + 2))?;
        let type_cell = record
            .get(type_col)
            .ok_or_else(|| anyhow!("row {}: missing Type cell", line + 2))?;
        let geo_type = GeoType::parse(type_cell)
            .ok_or_else(|| anyhow!("row {}: unknown geography type {:?}", line + 2, type_cell))?;

        let date = match date_col.and_then(|i| record.get(i)).filter(|s| !s.is_empty()) {
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("row {}: bad date {:?}", line + 2, s))?,
            None => {
                let y: i32 = year_col
                    .and_then(|i| record.get(i))
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| anyhow!("row {}: missing date and year", line + 2))?
                    .parse()
                    .with_context(|| format!("row {}: bad year", line + 2))?;
                NaiveDate::from_ymd_opt(y, 1, 1)
                    .ok_or_else(|| anyhow!("row {}: year {} out of range", line + 2, y))?
            }
        };

        let values = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                *i != area_col && *i != type_col && Some(*i) != date_col && Some(*i) != year_col
            })
            .filter_map(|(i, header)| {
                record
                    .get(i)
                    .and_then(|cell| cell.parse::<f64>().ok())
                    .map(|v| (header.to_string(), v))
            })
            .collect();

        rows.push(Observation::dated(area, geo_type, date, values));
    }
    Ok(Panel::new(rows))
}

/// Load a panel from a CSV file.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Panel> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_panel(file).with_context(|| format!("parse {}", path.display()))
}

/// Save a panel's rows as a pretty JSON array (tidy dump).
pub fn save_json<P: AsRef<Path>>(panel: &Panel, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(panel.rows())?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save a rendered comparison table as CSV.
pub fn save_table_csv<P: AsRef<Path>>(table: &WideTable, path: P) -> Result<()> {
    table.save_csv(path)
}
