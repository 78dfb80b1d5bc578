// src/output/mod.rs

//! Persist the reconciled dataset (CSV for the dashboard, Parquet for
//! everything else) and read the CSV back.

pub mod csv_file;
pub mod parquet_file;

use arrow::{
    array::{ArrayRef, Float64Array, Int32Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::{error::Result, reconcile::ReconciledDataset};

pub use csv_file::{read_csv, write_csv};
pub use parquet_file::write_parquet;

pub const MONTH_COLUMN: &str = "Month";
pub const YEAR_COLUMN: &str = "Year";
pub const PRESIDENT_COLUMN: &str = "President";
pub const PARTY_COLUMN: &str = "Party";

/// `Month, Year, <value columns…>, President, Party`.
pub fn dataset_schema(value_columns: &[String]) -> Arc<Schema> {
    let mut fields = Vec::with_capacity(value_columns.len() + 4);
    fields.push(Field::new(MONTH_COLUMN, DataType::Utf8, false));
    fields.push(Field::new(YEAR_COLUMN, DataType::Int32, false));
    for name in value_columns {
        fields.push(Field::new(name, DataType::Float64, true));
    }
    fields.push(Field::new(PRESIDENT_COLUMN, DataType::Utf8, true));
    fields.push(Field::new(PARTY_COLUMN, DataType::Utf8, true));
    Arc::new(Schema::new(fields))
}

/// The whole dataset as one Arrow batch.
pub fn to_record_batch(dataset: &ReconciledDataset) -> Result<RecordBatch> {
    let rows = &dataset.rows;
    let mut cols: Vec<ArrayRef> = Vec::with_capacity(dataset.columns.len() + 4);
    cols.push(Arc::new(StringArray::from_iter_values(
        rows.iter().map(|r| r.key.month.name()),
    )));
    cols.push(Arc::new(Int32Array::from_iter_values(
        rows.iter().map(|r| r.key.year),
    )));
    for i in 0..dataset.columns.len() {
        cols.push(Arc::new(Float64Array::from_iter(
            rows.iter().map(|r| r.values[i]),
        )));
    }
    cols.push(Arc::new(StringArray::from_iter(
        rows.iter().map(|r| r.president.as_deref()),
    )));
    cols.push(Arc::new(StringArray::from_iter(
        rows.iter().map(|r| r.party.as_deref()),
    )));

    RecordBatch::try_new(dataset_schema(&dataset.columns), cols).map_err(Into::into)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::{
        month::{Month, MonthKey},
        reconcile::{ReconciledDataset, ReconciledRow},
    };

    pub fn small_dataset() -> ReconciledDataset {
        let row = |y, m, gdp: Option<f64>, cpi: Option<f64>, p: Option<&str>, party: Option<&str>| {
            ReconciledRow {
                key: MonthKey::new(y, m),
                values: vec![gdp, cpi],
                president: p.map(str::to_string),
                party: party.map(str::to_string),
            }
        };
        ReconciledDataset {
            columns: vec!["GDP".into(), "CPI".into()],
            rows: vec![
                row(1952, Month::December, Some(358.2), Some(26.7), Some("Harry S Truman"), Some("Democratic")),
                row(1953, Month::January, Some(364.0), None, Some("Dwight D Eisenhower"), Some("Republican")),
                row(1953, Month::February, None, Some(26.6), None, None),
            ],
        }
    }
}
