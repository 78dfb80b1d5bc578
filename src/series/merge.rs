use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use super::normalize::Series;
use crate::{
    error::{Result, WrangleError},
    month::MonthKey,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EconRow {
    pub key: MonthKey,
    /// One cell per [`EconTable::columns`] entry.
    pub values: Vec<Option<f64>>,
}

/// Wide economic table: unique `(Year, Month)` rows in chronological order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EconTable {
    pub columns: Vec<String>,
    pub rows: Vec<EconRow>,
}

impl EconTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| WrangleError::MissingColumn {
                column: name.to_string(),
                available: self.columns.clone(),
            })
    }

    pub fn get(&self, key: MonthKey) -> Option<&EconRow> {
        self.rows
            .binary_search_by_key(&key, |r| r.key)
            .ok()
            .map(|i| &self.rows[i])
    }
}

/// Outer-join every series on `(Year, Month)`. No row is lost for a missing
/// value; a month absent from a series is null in that series' column.
///
/// A month repeated inside one series keeps its first value.
#[instrument(level = "info", skip(series), fields(series = series.len()))]
pub fn merge_series(series: &[Series]) -> Result<EconTable> {
    let mut columns: Vec<String> = Vec::with_capacity(series.len());
    for s in series {
        if columns.contains(&s.name) {
            return Err(WrangleError::DuplicateColumn(s.name.clone()));
        }
        columns.push(s.name.clone());
    }

    let width = columns.len();
    let mut joined: BTreeMap<MonthKey, (Vec<Option<f64>>, Vec<bool>)> = BTreeMap::new();
    for (col, s) in series.iter().enumerate() {
        for point in &s.points {
            let (values, seen) = joined
                .entry(point.key)
                .or_insert_with(|| (vec![None; width], vec![false; width]));
            if seen[col] {
                warn!(series = %s.name, month = %point.key, "duplicate month in series; keeping first");
                continue;
            }
            seen[col] = true;
            values[col] = point.value;
        }
    }

    let rows: Vec<EconRow> = joined
        .into_iter()
        .map(|(key, (values, _))| EconRow { key, values })
        .collect();
    debug!(rows = rows.len(), columns = width, "merged series");
    Ok(EconTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{month::Month, series::normalize::SeriesPoint};
    use std::collections::HashSet;

    fn series(name: &str, points: &[(i32, Month, f64)]) -> Series {
        Series {
            name: name.to_string(),
            points: points
                .iter()
                .map(|&(y, m, v)| SeriesPoint {
                    key: MonthKey::new(y, m),
                    value: Some(v),
                })
                .collect(),
        }
    }

    #[test]
    fn outer_join_keeps_every_distinct_month() {
        use Month::*;
        let gdp = series("GDP", &[(1948, January, 100.0), (1948, April, 104.0)]);
        let cpi = series("CPI", &[(1948, February, 23.6), (1948, January, 23.7)]);
        let un = series("UNRATE", &[(1947, December, 3.9), (1948, April, 3.9)]);

        let distinct: HashSet<MonthKey> = [&gdp, &cpi, &un]
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.key))
            .collect();

        let table = merge_series(&[gdp, cpi, un]).unwrap();
        assert_eq!(table.len(), distinct.len());
        assert_eq!(table.columns, vec!["GDP", "CPI", "UNRATE"]);

        let jan = table.get(MonthKey::new(1948, January)).unwrap();
        assert_eq!(jan.values, vec![Some(100.0), Some(23.7), None]);
    }

    #[test]
    fn rows_sorted_by_calendar_month() {
        use Month::*;
        let s = series(
            "GDP",
            &[
                (1950, December, 4.0),
                (1950, April, 2.0),
                (1950, August, 3.0),
                (1949, February, 1.0),
            ],
        );
        let table = merge_series(&[s]).unwrap();
        let order: Vec<_> = table.rows.iter().map(|r| r.values[0]).collect();
        assert_eq!(order, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn duplicate_column_rejected() {
        let a = series("GDP", &[]);
        let b = series("GDP", &[]);
        assert!(matches!(
            merge_series(&[a, b]),
            Err(WrangleError::DuplicateColumn(_))
        ));
    }
}
