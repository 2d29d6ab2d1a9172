//! CSV ↔ DataFrame adapters.
//!
//! Every column is read as text with normalized `snake_case` headers; typed
//! columns are produced later by the cleaning stage.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use polars::prelude::{DataFrame, DataType};
use tracing::debug;

use shiplink_common::{column_f64, column_strings, format_numeric, normalize_header, string_column};

use crate::error::{IngestError, Result};

/// Read a CSV file into a frame of string columns.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv_frame_from(file, path)
}

/// Read CSV data from any reader; `origin` is only used in error messages.
pub fn read_csv_frame_from<R: Read>(input: R, origin: &Path) -> Result<DataFrame> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let raw_headers = reader
        .headers()
        .map_err(|error| IngestError::csv(origin, error))?
        .clone();
    let headers = unique_headers(raw_headers.iter().map(normalize_header));

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|error| IngestError::csv(origin, error))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        for (idx, values) in cells.iter_mut().enumerate() {
            let value = record.get(idx).unwrap_or("");
            values.push(value.trim().trim_matches('\u{feff}').to_string());
        }
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, values)| string_column(name, values))
        .collect();
    let df = DataFrame::new(columns)?;
    debug!(
        source = %origin.display(),
        rows = df.height(),
        columns = df.width(),
        "read csv"
    );
    Ok(df)
}

/// Write a frame as CSV. Floats are written without trailing zeros.
pub fn write_csv_frame(df: &DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv_to(df, file, path)
}

/// Write a frame as CSV into any writer.
pub fn write_csv_to<W: Write>(df: &DataFrame, output: W, origin: &Path) -> Result<()> {
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let name = column.name().as_str();
        let values = match column.dtype() {
            DataType::Float32 | DataType::Float64 => column_f64(df, name)?
                .into_iter()
                .map(|value| value.map(format_numeric).unwrap_or_default())
                .collect(),
            _ => column_strings(df, name)?,
        };
        columns.push(values);
    }

    let mut writer = WriterBuilder::new().from_writer(output);
    let headers: Vec<&str> = df.get_columns().iter().map(|c| c.name().as_str()).collect();
    writer
        .write_record(&headers)
        .map_err(|error| IngestError::csv(origin, error))?;
    for row in 0..df.height() {
        writer
            .write_record(columns.iter().map(|values| values[row].as_str()))
            .map_err(|error| IngestError::csv(origin, error))?;
    }
    writer.flush().map_err(|source| IngestError::Io {
        path: origin.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn unique_headers<I: Iterator<Item = String>>(headers: I) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for (idx, header) in headers.enumerate() {
        let base = if header.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            header
        };
        let mut name = base.clone();
        let mut suffix = 2;
        while !seen.insert(name.clone()) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        out.push(name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_and_blank_headers_are_renamed() {
        let headers = unique_headers(
            ["date".to_string(), "date".to_string(), String::new()].into_iter(),
        );
        assert_eq!(headers, vec!["date", "date_2", "column_3"]);
    }

    #[test]
    fn reads_headers_and_skips_blank_rows() {
        let data = "EXPORT DATE,Country,Weight (KG)\n2023-01-05,Spain,1000\n,,\n2023-02-01,China,\n";
        let df = read_csv_frame_from(data.as_bytes(), Path::new("inline.csv")).unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["export_date", "country", "weight_kg"]);
        assert_eq!(df.height(), 2);
        assert_eq!(column_strings(&df, "weight_kg").unwrap(), vec!["1000", ""]);
    }
}
