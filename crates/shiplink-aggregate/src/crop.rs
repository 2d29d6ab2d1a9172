use std::collections::BTreeMap;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::debug;

use shiplink_common::{column_strings, string_column};
use shiplink_model::{CropCategory, CropLookup, columns};

use crate::error::Result;

/// Add a `crop` column holding the canonical crop of each commodity label.
///
/// A label missing from `lookup` fails the whole frame.
pub fn classify_crops(
    df: &DataFrame,
    commodity_column: &str,
    lookup: &CropLookup,
) -> Result<DataFrame> {
    let labels = column_strings(df, commodity_column)?;
    let mut resolved: BTreeMap<&str, CropCategory> = BTreeMap::new();
    for label in &labels {
        if !resolved.contains_key(label.as_str()) {
            resolved.insert(label.as_str(), lookup.classify(label)?);
        }
    }
    debug!(
        column = commodity_column,
        distinct = resolved.len(),
        "classified commodities"
    );
    let crops = labels
        .iter()
        .map(|label| resolved[label.as_str()].to_string())
        .collect();
    let mut out = df.clone();
    out.with_column(string_column(columns::CROP, crops))?;
    Ok(out)
}

/// Keep the rows whose `crop_column` equals `crop`.
///
/// `crop` must be a canonical crop name; anything else is an error listing
/// the valid names, even when the frame is empty.
pub fn filter_crop(df: &DataFrame, crop: &str, crop_column: &str) -> Result<DataFrame> {
    let crop: CropCategory = crop.parse()?;
    let keep: Vec<bool> = column_strings(df, crop_column)?
        .iter()
        .map(|value| value.eq_ignore_ascii_case(crop.as_str()))
        .collect();
    let mask = BooleanChunked::from_slice("crop_mask".into(), &keep);
    let out = df.filter(&mask)?;
    debug!(%crop, kept = out.height(), total = df.height(), "filtered crop");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use shiplink_common::f64_column;
    use shiplink_model::ModelError;

    use super::*;
    use crate::error::AggregateError;

    fn commodities() -> DataFrame {
        DataFrame::new(vec![
            string_column(
                "commodity",
                ["Sunflower oil", "Corn", "sunflower meal", "Wheat"]
                    .map(String::from)
                    .to_vec(),
            ),
            f64_column("weight_ton", vec![1.0, 2.0, 3.0, 4.0]),
        ])
        .unwrap()
    }

    #[test]
    fn classifies_and_filters() {
        let df = classify_crops(&commodities(), "commodity", &CropLookup::with_defaults()).unwrap();
        assert_eq!(
            column_strings(&df, "crop").unwrap(),
            vec!["sunflower", "corn", "sunflower", "wheat"]
        );
        let sunflower = filter_crop(&df, "Sunflower", "crop").unwrap();
        assert_eq!(sunflower.height(), 2);
    }

    #[test]
    fn unknown_commodity_is_fatal() {
        let err = classify_crops(&commodities(), "commodity", &CropLookup::empty()).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::Model(ModelError::UnknownValue { ref value, .. }) if value == "Sunflower oil"
        ));
    }

    #[test]
    fn unknown_crop_names_valid_set() {
        let err = filter_crop(&commodities(), "rice", "commodity").unwrap_err();
        assert!(err.to_string().contains("barley"));
    }
}
