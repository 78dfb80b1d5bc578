// src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WrangleError>;

#[derive(Debug, Error)]
pub enum WrangleError {
    #[error("row {row}: date {value:?} has no YYYY-MM year/month")]
    MalformedDate { row: usize, value: String },

    #[error("column {column:?} not found (available: {available:?})")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("value column {0:?} appears in more than one series")]
    DuplicateColumn(String),

    #[error("column {column:?} row {row}: {value:?} is not a number")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("GET {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("no <table> found in document")]
    NoTable,

    #[error("table header has no column starting with {0:?}")]
    MissingHeader(String),

    #[error("fallback terms overlap or are out of order at {0:?}")]
    OverlappingTerms(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
