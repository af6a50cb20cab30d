use econ_trends::labels::{LabelKind, Offset, place_labels};
use std::collections::BTreeMap;

const KINDS: [LabelKind; 5] = [
    LabelKind::Rate,
    LabelKind::Index,
    LabelKind::MonthlyIndex,
    LabelKind::Level,
    LabelKind::PerCapitaLevel,
];

fn no_offsets() -> BTreeMap<String, Offset> {
    BTreeMap::new()
}

fn gaps_hold(placed: &BTreeMap<String, f64>, min_gap: f64) -> bool {
    let mut ys: Vec<f64> = placed.values().copied().collect();
    ys.sort_by(|a, b| b.total_cmp(a));
    ys[0] - ys[1] >= min_gap - 1e-9 && ys[1] - ys[2] >= min_gap - 1e-9
}

#[test]
fn converged_index_labels_are_spread_apart() {
    let placed = place_labels(
        [("US", 100.0), ("State", 99.8), ("MSA", 99.5)],
        LabelKind::Index,
        100.0,
        &no_offsets(),
    );
    assert!(placed["US"] - placed["State"] >= 4.5);
    assert!(placed["State"] - placed["MSA"] >= 4.5);
    assert!(placed["US"] <= 100.0);
    // The middle value never moves except through the shared ceiling shift:
    // US was pushed to 104.3, so all three came down by 4.3.
    assert!((placed["State"] - 95.5).abs() < 1e-9);
    assert!((placed["MSA"] - 91.0).abs() < 1e-9);
}

#[test]
fn minimum_gap_and_ceiling_invariants_hold_for_all_kinds() {
    let scenarios: [[f64; 3]; 6] = [
        [100.0, 99.8, 99.5],
        [5.0, 5.0, 5.0],
        [12.4, 12.4, 3.0],
        [80.0, 45.0, 10.0],
        [101.0, 100.9, 100.8],
        [0.0, 0.0, 0.0],
    ];
    for kind in KINDS {
        for values in scenarios {
            let series_max = values.into_iter().fold(f64::NEG_INFINITY, f64::max);
            let placed = place_labels(
                [("a", values[0]), ("b", values[1]), ("c", values[2])],
                kind,
                series_max,
                &no_offsets(),
            );
            assert!(
                gaps_hold(&placed, kind.min_gap()),
                "gap violated for {:?} on {:?}",
                kind,
                values
            );
            let top = placed.values().copied().fold(f64::NEG_INFINITY, f64::max);
            assert!(
                top <= series_max + 1e-9,
                "ceiling violated for {:?} on {:?}",
                kind,
                values
            );
        }
    }
}

#[test]
fn well_separated_values_are_left_alone() {
    let placed = place_labels(
        [("US", 50.0), ("State", 30.0), ("MSA", 10.0)],
        LabelKind::Level,
        50.0,
        &no_offsets(),
    );
    assert_eq!(placed["US"], 50.0);
    assert_eq!(placed["State"], 30.0);
    assert_eq!(placed["MSA"], 10.0);
}

#[test]
fn level_kinds_overshoot_the_gap() {
    // Shortfall of 8 between equal neighbors, amplified by 1.2.
    let placed = place_labels(
        [("a", 100.0), ("b", 100.0), ("c", 50.0)],
        LabelKind::Level,
        200.0,
        &no_offsets(),
    );
    // "a" ties "b" and wins by name order, then moves up 9.6.
    assert!((placed["a"] - 109.6).abs() < 1e-9);
    assert_eq!(placed["b"], 100.0);
    assert_eq!(placed["c"], 50.0);
}

#[test]
fn manual_offsets_flip_sign_with_the_direction_toggle() {
    let mut offsets = BTreeMap::new();
    offsets.insert("US".to_string(), Offset::new(true, 2.0));
    offsets.insert("MSA".to_string(), Offset::new(false, 1.5));

    let base = place_labels(
        [("US", 50.0), ("State", 30.0), ("MSA", 10.0)],
        LabelKind::Level,
        50.0,
        &no_offsets(),
    );
    let nudged = place_labels(
        [("US", 50.0), ("State", 30.0), ("MSA", 10.0)],
        LabelKind::Level,
        50.0,
        &offsets,
    );
    assert_eq!(nudged["US"], base["US"] + 2.0);
    assert_eq!(nudged["State"], base["State"]);
    assert_eq!(nudged["MSA"], base["MSA"] - 1.5);
}

#[test]
fn offsets_apply_after_the_ceiling_clamp() {
    // Upward nudge may push the top label past the series max by design.
    let mut offsets = BTreeMap::new();
    offsets.insert("a".to_string(), Offset::new(true, 3.0));

    let placed = place_labels(
        [("a", 100.0), ("b", 99.0), ("c", 98.0)],
        LabelKind::Index,
        100.0,
        &offsets,
    );
    let unnudged = place_labels(
        [("a", 100.0), ("b", 99.0), ("c", 98.0)],
        LabelKind::Index,
        100.0,
        &no_offsets(),
    );
    assert_eq!(placed["a"], unnudged["a"] + 3.0);
    assert!(placed["a"] > 100.0);
}

#[test]
fn rate_label_values_format_as_percentages() {
    assert_eq!(LabelKind::Rate.format_value(4.35, None), "4.3%");
    assert_eq!(
        LabelKind::Index.format_value(121.0, Some(10.0)),
        "121.0 (CAGR=10%)"
    );
    assert_eq!(
        LabelKind::Index.format_value(104.5, Some(2.15)),
        "104.5 (CAGR=2.15%)"
    );
    assert_eq!(LabelKind::Level.format_value(64.0, None), "64.0");
    assert_eq!(LabelKind::Index.format_value(100.04, None), "100.0");
}
