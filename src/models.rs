use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Display name of the national aggregate present in every dataset.
pub const NATION: &str = "United States";

/// Derived column holding the rebased series (start period = 100).
pub const INDEX_COLUMN: &str = "Index";

/// Derived column holding the per-area compound annual growth rate.
pub const CAGR_COLUMN: &str = "CAGR";

/// Geography class of an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GeoType {
    Nation,
    State,
    /// Metropolitan Statistical Area.
    Msa,
    /// New England City and Town Area.
    Necta,
}

impl GeoType {
    /// Parse the `Type` column of the source datasets.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Nation" => Some(GeoType::Nation),
            "State" => Some(GeoType::State),
            "MSA" => Some(GeoType::Msa),
            "NECTA" => Some(GeoType::Necta),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeoType::Nation => "Nation",
            GeoType::State => "State",
            GeoType::Msa => "MSA",
            GeoType::Necta => "NECTA",
        }
    }
}

impl fmt::Display for GeoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which field identifies a period when rebasing or computing growth rates.
///
/// Annual datasets key on [`TimeKey::Year`]; monthly datasets key on
/// [`TimeKey::Date`] so that each area has exactly one row per period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKey {
    Year,
    Date,
}

impl TimeKey {
    /// The concrete period of an observation under this key.
    pub fn period_of(&self, obs: &Observation) -> Period {
        match self {
            TimeKey::Year => Period::Year(obs.year),
            TimeKey::Date => Period::Date(obs.date),
        }
    }
}

/// A concrete period: a calendar year or an exact date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Period {
    Year(i32),
    Date(NaiveDate),
}

impl Period {
    /// Elapsed time from `self` to `end`, in years. Date periods use
    /// fractional years (days / 365.25).
    pub fn years_until(&self, end: &Period) -> f64 {
        match (self, end) {
            (Period::Year(a), Period::Year(b)) => (b - a) as f64,
            (Period::Date(a), Period::Date(b)) => (*b - *a).num_days() as f64 / 365.25,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(y) => write!(f, "{}", y),
            Period::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Tidy row used throughout this crate: one observation of one area at one
/// point in time. Metric columns vary per dataset, so they live in a map;
/// a missing cell is an absent key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub area: String,
    pub geo_type: GeoType,
    pub date: NaiveDate,
    pub year: i32,
    pub values: BTreeMap<String, f64>,
}

impl Observation {
    /// Construct an annual observation dated January 1st of `year`.
    pub fn annual(area: &str, geo_type: GeoType, year: i32, values: BTreeMap<String, f64>) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, 1, 1)?;
        Some(Self {
            area: area.to_string(),
            geo_type,
            date,
            year,
            values,
        })
    }

    /// Construct a dated observation; the year is derived from the date.
    pub fn dated(area: &str, geo_type: GeoType, date: NaiveDate, values: BTreeMap<String, f64>) -> Self {
        Self {
            area: area.to_string(),
            geo_type,
            date,
            year: date.year(),
            values,
        }
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}
