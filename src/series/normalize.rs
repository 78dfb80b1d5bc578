use serde::Deserialize;
use std::path::Path;
use tracing::{debug, instrument};

use super::{date_parser::parse_observation_month, raw_table::RawTable};
use crate::{
    error::{Result, WrangleError},
    month::MonthKey,
    utils::parse_value,
};

/// Date column every economic CSV carries.
pub const DATE_COLUMN: &str = "observation_date";

/// How to turn one raw CSV into a named monthly series.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesSpec {
    /// Name of the value column in the output.
    pub value_col: String,
    /// Row positions to remove before dates are parsed.
    #[serde(default)]
    pub drop_rows: Vec<usize>,
    /// Source column whose values populate `value_col`.
    #[serde(default)]
    pub rename_from: Option<String>,
}

impl SeriesSpec {
    pub fn new(value_col: impl Into<String>) -> Self {
        Self {
            value_col: value_col.into(),
            drop_rows: Vec::new(),
            rename_from: None,
        }
    }

    pub fn rename_from(mut self, column: impl Into<String>) -> Self {
        self.rename_from = Some(column.into());
        self
    }

    pub fn drop_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.drop_rows = rows.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub key: MonthKey,
    pub value: Option<f64>,
}

/// A canonical `(Year, Month, value)` series, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

/// Normalize an already-read table. Any row whose date lacks a year or month
/// fails the whole series.
pub fn normalize_series(mut table: RawTable, spec: &SeriesSpec) -> Result<Series> {
    table.drop_rows(&spec.drop_rows);

    let date_idx = table.column_index(DATE_COLUMN)?;
    let source = spec.rename_from.as_deref().unwrap_or(&spec.value_col);
    let value_idx = table.column_index(source)?;

    let mut points = Vec::with_capacity(table.rows.len());
    for (row, fields) in table.rows.iter().enumerate() {
        let raw_date = &fields[date_idx];
        let key = parse_observation_month(raw_date).ok_or_else(|| WrangleError::MalformedDate {
            row,
            value: raw_date.clone(),
        })?;
        let value = parse_value(&fields[value_idx]).map_err(|_| WrangleError::InvalidValue {
            column: source.to_string(),
            row,
            value: fields[value_idx].clone(),
        })?;
        points.push(SeriesPoint { key, value });
    }

    debug!(series = %spec.value_col, points = points.len(), "normalized series");
    Ok(Series {
        name: spec.value_col.clone(),
        points,
    })
}

/// Read a CSV from disk and normalize it.
#[instrument(level = "info", skip(path, spec), fields(path = %path.as_ref().display(), series = %spec.value_col))]
pub fn load_series<P: AsRef<Path>>(path: P, spec: &SeriesSpec) -> Result<Series> {
    let table = RawTable::from_path(path.as_ref())?;
    normalize_series(table, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::Month;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GDP_CSV: &str = "observation_date,GDP\n\
1947-01-01,243.164\n\
1947-04-01,245.968\n\
1947-07-01,249.585\n\
1947-10-01,259.745\n";

    fn raw(s: &str) -> RawTable {
        RawTable::from_reader(s.as_bytes()).unwrap()
    }

    #[test]
    fn preserves_values_without_rename() {
        let series = normalize_series(raw(GDP_CSV), &SeriesSpec::new("GDP")).unwrap();
        assert_eq!(series.name, "GDP");
        let values: Vec<_> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(
            values,
            vec![Some(243.164), Some(245.968), Some(249.585), Some(259.745)]
        );
        assert_eq!(series.points[1].key, MonthKey::new(1947, Month::April));
    }

    #[test]
    fn rename_moves_source_column() {
        let csv = "observation_date,CPIAUCSL\n1948-01-01,23.68\n1948-02-01,23.67\n";
        let spec = SeriesSpec::new("CPI").rename_from("CPIAUCSL");
        let series = normalize_series(raw(csv), &spec).unwrap();
        assert_eq!(series.name, "CPI");
        assert_eq!(series.points[0].value, Some(23.68));
    }

    #[test]
    fn drop_applies_before_date_parsing() {
        let csv = "observation_date,UNRATE\nnot a date,0\n1948-01-01,3.4\n";
        assert!(matches!(
            normalize_series(raw(csv), &SeriesSpec::new("UNRATE")),
            Err(WrangleError::MalformedDate { row: 0, .. })
        ));
        let series =
            normalize_series(raw(csv), &SeriesSpec::new("UNRATE").drop_rows([0])).unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].key, MonthKey::new(1948, Month::January));
    }

    #[test]
    fn missing_value_column_is_schema_error() {
        let err = normalize_series(raw(GDP_CSV), &SeriesSpec::new("CPI")).unwrap_err();
        assert!(matches!(err, WrangleError::MissingColumn { ref column, .. } if column == "CPI"));
    }

    #[test]
    fn fred_missing_marker_is_null() {
        let csv = "observation_date,GDP\n1948-01-01,.\n1948-02-01,\n";
        let series = normalize_series(raw(csv), &SeriesSpec::new("GDP")).unwrap();
        assert!(series.points.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn load_from_file() -> anyhow::Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(GDP_CSV.as_bytes())?;
        let series = load_series(tmp.path(), &SeriesSpec::new("GDP"))?;
        assert_eq!(series.points.len(), 4);
        Ok(())
    }
}
