//! Dataset loading from CSV and Parquet files

use anyhow::Result;
use polars::prelude::*;

use crate::data::Dataset;

/// Load a numeric dataset from a CSV or Parquet file.
///
/// Column names become attribute labels; every column must be numeric and
/// complete.
pub fn load_dataset(path: &str) -> Result<Dataset> {
    // Check if the file exists
    if !std::path::Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    log::info!("Reading input file: {}", path);

    let df = if path.ends_with(".parquet") {
        LazyFrame::scan_parquet(path, Default::default())?.collect()?
    } else if path.ends_with(".csv") {
        LazyCsvReader::new(path).with_has_header(true).finish()?.collect()?
    } else {
        return Err(anyhow::anyhow!(
            "Unsupported input format: {} (expected .csv or .parquet)",
            path
        ));
    };

    log::info!("Loaded {} rows with {} columns", df.height(), df.width());

    dataset_from_frame(&df)
}

/// Convert a data frame into a row-major dataset
fn dataset_from_frame(df: &DataFrame) -> Result<Dataset> {
    let mut labels = Vec::with_capacity(df.width());
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        if !is_numeric(column.dtype()) {
            return Err(anyhow::anyhow!(
                "Column {} is not numeric ({})",
                column.name(),
                column.dtype()
            ));
        }

        let cast = column.cast(&DataType::Float64)?;
        let values = cast.f64()?;
        let mut cells = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            match values.get(row) {
                Some(value) => cells.push(value),
                None => {
                    return Err(anyhow::anyhow!(
                        "Column {} has a missing value at row {}",
                        column.name(),
                        row
                    ))
                }
            }
        }

        labels.push(column.name().to_string());
        columns.push(cells);
    }

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        records.push(columns.iter().map(|c| c[row]).collect());
    }

    Ok(Dataset::new(labels, records)?)
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}
