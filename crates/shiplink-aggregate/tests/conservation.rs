//! Grouping never creates or loses tonnage.

use polars::prelude::DataFrame;
use proptest::prelude::*;

use shiplink_aggregate::{GroupSpec, group_records};
use shiplink_common::{column_f64, f64_column, string_column};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// Half-ton weights keep every partial sum exact in `f64`.
fn arb_rows() -> impl Strategy<Value = Vec<(String, String, String, f64)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["2023-01", "2023-02", "2023-03"]),
            prop::sample::select(vec!["spain", "china", "egypt", "italy"]),
            prop::sample::select(vec!["corn", "wheat", "sunflower"]),
            0u32..20_000,
        )
            .prop_map(|(period, country, crop, halves)| {
                (
                    period.to_string(),
                    country.to_string(),
                    crop.to_string(),
                    f64::from(halves) / 2.0,
                )
            }),
        0..60,
    )
}

fn frame(rows: &[(String, String, String, f64)]) -> DataFrame {
    DataFrame::new(vec![
        string_column("period", rows.iter().map(|r| r.0.clone()).collect()),
        string_column("country", rows.iter().map(|r| r.1.clone()).collect()),
        string_column("crop", rows.iter().map(|r| r.2.clone()).collect()),
        f64_column("weight_ton", rows.iter().map(|r| r.3).collect()),
    ])
    .unwrap()
}

fn arb_keys() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(vec!["period", "country", "crop"], 0..=3)
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn grouped_totals_match_input_total(rows in arb_rows(), keys in arb_keys()) {
        let df = frame(&rows);
        let spec = GroupSpec::new(keys.iter().copied()).sum("weight_ton");
        let grouped = group_records(&df, &spec).unwrap();

        let expected: f64 = rows.iter().map(|r| r.3).sum();
        let actual: f64 = column_f64(&grouped, "weight_ton")
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .sum();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn groups_are_distinct_keys(rows in arb_rows()) {
        let df = frame(&rows);
        let spec = GroupSpec::new(["period", "country"]).sum("weight_ton");
        let grouped = group_records(&df, &spec).unwrap();

        let distinct: std::collections::BTreeSet<(&str, &str)> =
            rows.iter().map(|r| (r.0.as_str(), r.1.as_str())).collect();
        prop_assert_eq!(grouped.height(), distinct.len());
    }
}
