//! Fixed U.S. geography lookups and the three-way comparison subjects.
//!
//! Metro display names embed their parent state's postal code after the
//! comma (`"New York-Newark-Jersey City, NY-NJ-PA"`); the first code names
//! the parent state used for the state series.

use crate::error::Error;
use crate::models::{GeoType, NATION};
use crate::panel::Panel;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// U.S. state and territory names with their two-letter postal codes.
const STATES: [(&str, &str); 56] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
    ("District of Columbia", "DC"),
    ("American Samoa", "AS"),
    ("Guam", "GU"),
    ("Northern Mariana Islands", "MP"),
    ("Puerto Rico", "PR"),
    ("U.S. Virgin Islands", "VI"),
];

fn name_to_code() -> &'static BTreeMap<&'static str, &'static str> {
    static MAP: OnceLock<BTreeMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| STATES.iter().copied().collect())
}

fn code_to_name() -> &'static BTreeMap<&'static str, &'static str> {
    static MAP: OnceLock<BTreeMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| STATES.iter().map(|(name, code)| (*code, *name)).collect())
}

/// Postal code for a state or territory name.
pub fn state_to_abbrev(name: &str) -> Option<&'static str> {
    name_to_code().get(name).copied()
}

/// State or territory name for a postal code.
pub fn abbrev_to_state(code: &str) -> Option<&'static str> {
    code_to_name().get(code).copied()
}

/// Parent state of a metro display name: the postal code between the comma
/// and the first hyphen of the state suffix.
pub fn parent_state(metro: &str) -> Result<&'static str, Error> {
    let suffix = metro
        .split(", ")
        .nth(1)
        .ok_or_else(|| Error::UnknownGeography(metro.to_string()))?;
    let code = suffix.split('-').next().unwrap_or(suffix).trim();
    abbrev_to_state(code).ok_or_else(|| Error::UnknownGeography(metro.to_string()))
}

/// Short display label for a metro area: its first city name plus the
/// geography class, e.g. `"New York MSA"`.
pub fn metro_label(metro: &str, geo_type: GeoType) -> String {
    let city = metro.split(',').next().unwrap_or(metro);
    let first = city.split('-').next().unwrap_or(city).trim();
    format!("{} {}", first, geo_type)
}

/// The three comparison subjects for one user selection: the nation, the
/// metro's parent state, and the metro itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeographyTriple {
    pub nation: String,
    pub state: String,
    pub metro: String,
}

impl GeographyTriple {
    /// Resolve the triple for a selected metro area and validate that all
    /// three members are present in the panel.
    pub fn resolve(metro: &str, panel: &Panel) -> Result<Self, Error> {
        let state = parent_state(metro)?;
        let triple = Self {
            nation: NATION.to_string(),
            state: state.to_string(),
            metro: metro.to_string(),
        };
        for name in triple.names() {
            if !panel.contains_area(name) {
                return Err(Error::UnknownGeography(name.to_string()));
            }
        }
        Ok(triple)
    }

    pub fn names(&self) -> [&str; 3] {
        [&self.nation, &self.state, &self.metro]
    }
}
