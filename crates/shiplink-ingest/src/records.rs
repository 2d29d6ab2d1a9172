use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

use shiplink_common::{f64_column, string_column};
use shiplink_model::{ShipmentRecord, columns};

use crate::error::Result;

/// Build a frame with the standard cleaned columns from typed records.
///
/// Columns: `period`, `year`, `month`, `country`, `crop`, `weight_ton`,
/// `shipper` (empty when absent) and `source`.
pub fn records_frame(records: &[ShipmentRecord]) -> Result<DataFrame> {
    let periods = records.iter().map(|r| r.period.label()).collect();
    let years: Vec<i32> = records.iter().map(|r| r.period.year()).collect();
    let months: Vec<i32> = records
        .iter()
        .map(|r| r.period.month_number() as i32)
        .collect();
    let countries = records.iter().map(|r| r.country.clone()).collect();
    let crops = records.iter().map(|r| r.crop.to_string()).collect();
    let weights = records.iter().map(|r| r.weight_tons).collect();
    let shippers = records
        .iter()
        .map(|r| r.shipper_raw.clone().unwrap_or_default())
        .collect();
    let sources = records.iter().map(|r| r.source.to_string()).collect();

    let df = DataFrame::new(vec![
        string_column(columns::PERIOD, periods),
        Series::new(columns::YEAR.into(), years).into_column(),
        Series::new(columns::MONTH.into(), months).into_column(),
        string_column(columns::COUNTRY, countries),
        string_column(columns::CROP, crops),
        f64_column(columns::WEIGHT_TON, weights),
        string_column(columns::SHIPPER, shippers),
        string_column(columns::SOURCE, sources),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use shiplink_common::column_strings;
    use shiplink_model::{CropCategory, ShipmentPeriod, Source};

    use super::*;

    #[test]
    fn records_become_standard_columns() {
        let period = ShipmentPeriod::month(2023, 1).unwrap();
        let records = vec![
            ShipmentRecord::new(Source::Ig, period, "Spain", CropCategory::Corn, 12.5)
                .unwrap()
                .with_shipper("Kernel"),
            ShipmentRecord::new(Source::Bsgi, period, "china", CropCategory::Wheat, 40.0).unwrap(),
        ];
        let df = records_frame(&records).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(column_strings(&df, columns::PERIOD).unwrap(), vec!["2023-01"; 2]);
        assert_eq!(column_strings(&df, columns::SHIPPER).unwrap(), vec!["Kernel", ""]);
        assert_eq!(column_strings(&df, columns::SOURCE).unwrap(), vec!["ig", "bsgi"]);
    }
}
