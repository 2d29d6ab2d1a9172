use std::fs;
use std::path::Path;

use shiplink_common::{column_f64, column_strings};
use shiplink_ingest::{
    IngestError, coerce_weights, derive_periods, kilograms_to_tons, lowercase_shippers,
    read_csv_frame, read_csv_frame_from, standardize_countries, write_csv_frame,
};
use shiplink_model::{ModelError, ValueLookup};

const CUSTOMS: &str = "\
EXPORT DATE,COUNTRY,SHIPPER,WEIGHT (KG)
2022-08-15,Іспанія,ТОВ  Кернел-Трейд,25000
2022-08-20,ESPAÑA,Other Farm LLC,\"1,500\"
2022-09-01,Китай,ТОВ Кернел-Трейд,0
";

fn customs() -> polars::prelude::DataFrame {
    read_csv_frame_from(CUSTOMS.as_bytes(), Path::new("customs.csv")).expect("read customs")
}

#[test]
fn cleaning_stage_produces_standard_columns() {
    let lookup = ValueLookup::countries([
        ("Іспанія", "spain"),
        ("España", "spain"),
        ("Китай", "china"),
    ]);

    let df = customs();
    let df = derive_periods(&df, "export_date").unwrap();
    let df = standardize_countries(&df, "country", &lookup).unwrap();
    let df = kilograms_to_tons(&df, "weight_kg", "weight_ton").unwrap();
    let df = lowercase_shippers(&df, "shipper").unwrap();

    assert_eq!(
        column_strings(&df, "period").unwrap(),
        vec!["2022-08", "2022-08", "2022-09"]
    );
    assert_eq!(
        column_strings(&df, "country").unwrap(),
        vec!["spain", "spain", "china"]
    );
    assert_eq!(
        column_f64(&df, "weight_ton").unwrap(),
        vec![Some(25.0), Some(1.5), Some(0.0)]
    );
    assert_eq!(
        column_strings(&df, "shipper_low").unwrap()[0],
        "тов кернел-трейд"
    );
}

#[test]
fn unknown_country_is_fatal() {
    let lookup = ValueLookup::countries([("Іспанія", "spain")]);
    let err = standardize_countries(&customs(), "country", &lookup).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Model(ModelError::UnknownValue { ref value, .. }) if value == "ESPAÑA"
    ));
}

#[test]
fn negative_weight_is_rejected() {
    let df = read_csv_frame_from(
        "weight\n10\n-2\n".as_bytes(),
        Path::new("weights.csv"),
    )
    .unwrap();
    let err = coerce_weights(&df, "weight").unwrap_err();
    assert!(matches!(err, IngestError::InvalidWeight { row: 1, .. }));
}

#[test]
fn invalid_date_reports_row() {
    let df = read_csv_frame_from("date\n2023-01-01\nsoon\n".as_bytes(), Path::new("d.csv")).unwrap();
    let err = derive_periods(&df, "date").unwrap_err();
    assert!(err.to_string().contains("soon"));
    assert!(matches!(err, IngestError::InvalidDate { row: 1, .. }));
}

#[test]
fn export_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("clean.csv");
    let df = coerce_weights(&customs(), "weight_kg").unwrap();
    write_csv_frame(&df, &path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("export_date,country,shipper,weight_kg\n"));
    assert!(written.contains(",1500\n"));

    let back = read_csv_frame(&path).unwrap();
    assert_eq!(back.height(), 3);
    assert_eq!(column_strings(&back, "weight_kg").unwrap(), vec!["25000", "1500", "0"]);
}
