use econ_trends::models::{CAGR_COLUMN, INDEX_COLUMN};
use econ_trends::{Error, GeoType, Observation, Panel, TimeKey, growth};
use chrono::NaiveDate;
use std::collections::BTreeMap;

fn obs(area: &str, geo_type: GeoType, year: i32, pop: f64) -> Observation {
    Observation::annual(
        area,
        geo_type,
        year,
        BTreeMap::from([("Population".to_string(), pop)]),
    )
    .unwrap()
}

/// The three-geography panel from the dashboard's population tab, shrunk to
/// three years.
fn population_panel() -> Panel {
    let mut rows = Vec::new();
    for (year, v) in [(2000, 100.0), (2001, 110.0), (2002, 121.0)] {
        rows.push(obs("United States", GeoType::Nation, year, v));
    }
    for (year, v) in [(2000, 50.0), (2001, 52.0), (2002, 54.0)] {
        rows.push(obs("New York", GeoType::State, year, v));
    }
    for (year, v) in [(2000, 30.0), (2001, 33.0), (2002, 36.0)] {
        rows.push(obs(
            "New York-Newark-Jersey City, NY-NJ-PA",
            GeoType::Msa,
            year,
            v,
        ));
    }
    Panel::new(rows)
}

fn series(panel: &Panel, area: &str, column: &str) -> Vec<f64> {
    panel
        .rows()
        .iter()
        .filter(|o| o.area == area)
        .filter_map(|o| o.value(column))
        .collect()
}

#[test]
fn rebase_sets_each_area_baseline_to_100() {
    let panel = growth::rebase(&population_panel(), "Population", TimeKey::Year).unwrap();
    for area in [
        "United States",
        "New York",
        "New York-Newark-Jersey City, NY-NJ-PA",
    ] {
        let index = series(&panel, area, INDEX_COLUMN);
        assert_eq!(index[0], 100.0, "{area} baseline");
    }
    assert_eq!(
        series(&panel, "United States", INDEX_COLUMN),
        vec![100.0, 110.0, 121.0]
    );
    // 33/30 * 100 = 110.0, 36/30 * 100 = 120.0
    assert_eq!(
        series(&panel, "New York-Newark-Jersey City, NY-NJ-PA", INDEX_COLUMN),
        vec![100.0, 110.0, 120.0]
    );
}

#[test]
fn index_rounds_to_three_decimals() {
    let panel = Panel::new(vec![
        obs("United States", GeoType::Nation, 2000, 3.0),
        obs("United States", GeoType::Nation, 2001, 4.0),
    ]);
    let rebased = growth::rebase(&panel, "Population", TimeKey::Year).unwrap();
    // 4/3 * 100 = 133.333...
    assert_eq!(series(&rebased, "United States", INDEX_COLUMN)[1], 133.333);
}

#[test]
fn cagr_matches_hand_computation_and_broadcasts() {
    let panel = growth::cagr(&population_panel(), "Population", TimeKey::Year).unwrap();
    // (121/100)^(1/2) - 1 = 0.10 exactly
    assert_eq!(series(&panel, "United States", CAGR_COLUMN), vec![10.0; 3]);
    // (54/50)^(1/2) - 1 = 3.92%
    assert_eq!(series(&panel, "New York", CAGR_COLUMN), vec![3.92; 3]);
}

#[test]
fn cagr_round_trip_reconstructs_final_value() {
    let panel = growth::cagr(&population_panel(), "Population", TimeKey::Year).unwrap();
    for (area, vbegin, vfinal) in [
        ("United States", 100.0, 121.0),
        ("New York", 50.0, 54.0),
        ("New York-Newark-Jersey City, NY-NJ-PA", 30.0, 36.0),
    ] {
        let rate = series(&panel, area, CAGR_COLUMN)[0];
        let reconstructed = vbegin * (1.0 + rate / 100.0).powi(2);
        let err = (reconstructed - vfinal).abs() / vfinal;
        assert!(err < 1e-3, "{area}: reconstruction off by {err}");
    }
}

#[test]
fn duplicate_baseline_rows_are_rejected() {
    let mut rows = vec![
        obs("United States", GeoType::Nation, 2000, 100.0),
        obs("United States", GeoType::Nation, 2000, 101.0),
        obs("United States", GeoType::Nation, 2001, 110.0),
    ];
    rows.push(obs("Texas", GeoType::State, 2000, 50.0));
    rows.push(obs("Texas", GeoType::State, 2001, 55.0));
    let panel = Panel::new(rows);

    match growth::rebase(&panel, "Population", TimeKey::Year) {
        Err(Error::MissingBaseline { area, found, .. }) => {
            assert_eq!(area, "United States");
            assert_eq!(found, 2);
        }
        other => panic!("expected MissingBaseline, got {:?}", other),
    }
}

#[test]
fn baseline_without_the_variable_is_missing() {
    let mut first = obs("United States", GeoType::Nation, 2000, 0.0);
    first.values.clear();
    let panel = Panel::new(vec![first, obs("United States", GeoType::Nation, 2001, 110.0)]);

    assert!(matches!(
        growth::rebase(&panel, "Population", TimeKey::Year),
        Err(Error::MissingBaseline { found: 0, .. })
    ));
}

#[test]
fn cagr_needs_every_area_at_the_global_bounds() {
    // Texas starts a year late, so it has no value at the global start.
    let rows = vec![
        obs("United States", GeoType::Nation, 2000, 100.0),
        obs("United States", GeoType::Nation, 2002, 121.0),
        obs("Texas", GeoType::State, 2001, 50.0),
        obs("Texas", GeoType::State, 2002, 55.0),
    ];
    let panel = Panel::new(rows);

    match growth::cagr(&panel, "Population", TimeKey::Year) {
        Err(Error::MissingBaseline { area, .. }) => assert_eq!(area, "Texas"),
        other => panic!("expected MissingBaseline, got {:?}", other),
    }
}

#[test]
fn single_period_cagr_is_degenerate() {
    let panel = Panel::new(vec![obs("United States", GeoType::Nation, 2000, 100.0)]);
    assert_eq!(
        growth::cagr(&panel, "Population", TimeKey::Year),
        Err(Error::DegenerateRange)
    );
}

#[test]
fn monthly_panels_rebase_on_dates() {
    let mut rows = Vec::new();
    for (month, v) in [(1, 100.0), (2, 98.0), (3, 96.0)] {
        rows.push(Observation::dated(
            "United States",
            GeoType::Nation,
            NaiveDate::from_ymd_opt(2020, month, 1).unwrap(),
            BTreeMap::from([("Employment".to_string(), v)]),
        ));
    }
    let panel = Panel::new(rows);

    // All rows share the year, so the annual key cannot find a unique
    // baseline, while the date key can.
    assert!(matches!(
        growth::rebase(&panel, "Employment", TimeKey::Year),
        Err(Error::MissingBaseline { found: 3, .. })
    ));
    let rebased = growth::rebase(&panel, "Employment", TimeKey::Date).unwrap();
    assert_eq!(
        series(&rebased, "United States", INDEX_COLUMN),
        vec![100.0, 98.0, 96.0]
    );
}
