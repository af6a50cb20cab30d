//! Annual resampling of panels.

use crate::models::{GeoType, Observation};
use crate::panel::Panel;
use chrono::NaiveDate;
use std::collections::BTreeMap;

struct Bucket {
    geo_type: GeoType,
    date: NaiveDate,
    sums: BTreeMap<String, (f64, u32)>,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Collapse to one row per (area, calendar year): the arithmetic mean of
/// every metric column present, rounded to 1 decimal. Derived `Index` and
/// `CAGR` columns are averaged along with the raw metrics; a per-area CAGR
/// is constant across a year's rows, so its mean only re-rounds it.
pub fn aggregate_annual(panel: &Panel) -> Panel {
    let mut buckets: BTreeMap<(String, i32), Bucket> = BTreeMap::new();
    for o in panel.rows() {
        let bucket = buckets
            .entry((o.area.clone(), o.year))
            .or_insert_with(|| Bucket {
                geo_type: o.geo_type,
                date: o.date,
                sums: BTreeMap::new(),
            });
        if o.date < bucket.date {
            bucket.date = o.date;
        }
        for (column, v) in &o.values {
            let cell = bucket.sums.entry(column.clone()).or_insert((0.0, 0));
            cell.0 += v;
            cell.1 += 1;
        }
    }

    let rows = buckets
        .into_iter()
        .map(|((area, year), bucket)| Observation {
            area,
            geo_type: bucket.geo_type,
            date: bucket.date,
            year,
            values: bucket
                .sums
                .into_iter()
                .map(|(column, (sum, n))| (column, round1(sum / n as f64)))
                .collect(),
        })
        .collect();
    Panel::new(rows)
}
