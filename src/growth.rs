//! Growth-index rebasing and compound annual growth rates.

use crate::error::Error;
use crate::models::{CAGR_COLUMN, INDEX_COLUMN, Observation, Period, TimeKey};
use crate::panel::Panel;
use std::collections::BTreeMap;

fn round_to(v: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (v * f).round() / f
}

/// The single observation of `area` at `period`, validated: zero or
/// multiple matching rows fail with [`Error::MissingBaseline`], as does a
/// matching row without a value for `variable`.
fn value_at<'a>(
    rows: impl Iterator<Item = &'a Observation>,
    area: &str,
    variable: &str,
    key: TimeKey,
    period: Period,
) -> Result<f64, Error> {
    let matches: Vec<&Observation> = rows.filter(|o| key.period_of(o) == period).collect();
    let missing = |found: usize| Error::MissingBaseline {
        area: area.to_string(),
        period: period.to_string(),
        found,
    };
    match matches.as_slice() {
        [one] => one.value(variable).ok_or_else(|| missing(0)),
        other => Err(missing(other.len())),
    }
}

/// Rebase `variable` so each area's value at its own start period equals
/// 100, writing the result into the derived `Index` column (3-decimal
/// rounding). Rows without a value for `variable` get no `Index`.
pub fn rebase(panel: &Panel, variable: &str, key: TimeKey) -> Result<Panel, Error> {
    let mut baselines: BTreeMap<String, f64> = BTreeMap::new();
    for area in panel.areas() {
        let area_rows = || panel.rows().iter().filter(|o| o.area == area);
        let start = match area_rows().map(|o| key.period_of(o)).min() {
            Some(p) => p,
            None => continue,
        };
        let v0 = value_at(area_rows(), area, variable, key, start)?;
        baselines.insert(area.to_string(), v0);
    }

    let rows = panel
        .rows()
        .iter()
        .cloned()
        .map(|mut o| {
            if let (Some(v0), Some(v)) = (baselines.get(&o.area), o.value(variable)) {
                o.values
                    .insert(INDEX_COLUMN.to_string(), round_to(v / v0 * 100.0, 3));
            }
            o
        })
        .collect();
    Ok(Panel::new(rows))
}

/// Compound annual growth rate of `variable` between the panel's global
/// first and last period, one scalar per area (2-decimal rounding)
/// broadcast into the derived `CAGR` column of every row of that area.
///
/// The span is measured in years; [`TimeKey::Date`] uses fractional years.
/// A single-period panel fails with [`Error::DegenerateRange`].
pub fn cagr(panel: &Panel, variable: &str, key: TimeKey) -> Result<Panel, Error> {
    let start = panel
        .rows()
        .iter()
        .map(|o| key.period_of(o))
        .min()
        .ok_or_else(|| Error::DataGap("empty panel".to_string()))?;
    let end = panel
        .rows()
        .iter()
        .map(|o| key.period_of(o))
        .max()
        .ok_or_else(|| Error::DataGap("empty panel".to_string()))?;
    let t = start.years_until(&end);
    if t == 0.0 {
        return Err(Error::DegenerateRange);
    }

    let mut rates: BTreeMap<String, f64> = BTreeMap::new();
    for area in panel.areas() {
        let area_rows = || panel.rows().iter().filter(|o| o.area == area);
        let vbegin = value_at(area_rows(), area, variable, key, start)?;
        let vfinal = value_at(area_rows(), area, variable, key, end)?;
        let rate = ((vfinal / vbegin).powf(1.0 / t) - 1.0) * 100.0;
        rates.insert(area.to_string(), round_to(rate, 2));
    }

    let rows = panel
        .rows()
        .iter()
        .cloned()
        .map(|mut o| {
            if let Some(rate) = rates.get(&o.area) {
                o.values.insert(CAGR_COLUMN.to_string(), *rate);
            }
            o
        })
        .collect();
    Ok(Panel::new(rows))
}
