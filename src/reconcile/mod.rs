// src/reconcile/mod.rs

//! Join the economic table with presidential terms into the final dataset.

pub mod interpolate;
pub mod trim;

use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{Result, WrangleError},
    month::MonthKey,
    presidents::{TermIndex, TermTable},
    series::EconTable,
    utils::clean_opt,
};

pub use interpolate::{fill_gaps, forward_fill, interpolate_linear};
pub use trim::TrailingTrim;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Rows before this year are dropped.
    pub min_year: i32,
    /// Value columns to gap-fill.
    pub interpolate: Vec<String>,
    pub trailing_trim: TrailingTrim,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            min_year: 1948,
            interpolate: vec!["GDP".to_string()],
            trailing_trim: TrailingTrim::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRow {
    pub key: MonthKey,
    pub values: Vec<Option<f64>>,
    pub president: Option<String>,
    pub party: Option<String>,
}

/// The month-indexed table everything downstream reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconciledDataset {
    /// Value column names, in `ReconciledRow::values` order.
    pub columns: Vec<String>,
    pub rows: Vec<ReconciledRow>,
}

impl ReconciledDataset {
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

    pub fn column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Distinct presidents in order of first appearance.
    pub fn presidents(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .filter_map(|r| r.president.as_deref())
            .filter(|p| seen.insert(*p))
            .collect()
    }
}

/// Step 1: outer join on `(Year, Month)`, trimming scraped text. Rows come
/// out sorted and unique by key.
pub fn merge_terms(econ: &EconTable, terms: &TermTable, min_year: i32) -> Vec<ReconciledRow> {
    let keys: BTreeSet<MonthKey> = econ
        .rows
        .iter()
        .map(|r| r.key)
        .chain(terms.rows.iter().map(|r| r.key))
        .filter(|k| k.year >= min_year)
        .collect();

    keys.into_iter()
        .map(|key| {
            let values = econ
                .get(key)
                .map(|r| r.values.clone())
                .unwrap_or_else(|| vec![None; econ.columns.len()]);
            let term = terms.get(key);
            ReconciledRow {
                key,
                values,
                president: clean_opt(term.and_then(|t| t.president.as_deref())),
                party: clean_opt(term.and_then(|t| t.party.as_deref())),
            }
        })
        .collect()
}

/// Step 2: give rows without a president the one whose fallback range
/// contains their month. Party is filled only when it is also missing.
/// Returns how many rows were filled.
pub fn fill_from_fallback(rows: &mut [ReconciledRow], index: &TermIndex) -> usize {
    let mut filled = 0;
    for row in rows.iter_mut().filter(|r| r.president.is_none()) {
        if let Some(range) = index.lookup(row.key) {
            row.president = Some(range.president.clone());
            if row.party.is_none() {
                row.party = range.party.clone();
            }
            filled += 1;
        }
    }
    filled
}

/// Build the final dataset. Deterministic: the same inputs always give the
/// same output.
#[instrument(level = "info", skip_all, fields(econ_rows = econ.len(), term_rows = terms.len()))]
pub fn reconcile(
    econ: &EconTable,
    terms: &TermTable,
    fallback: &TermIndex,
    opts: &ReconcileOptions,
) -> Result<ReconciledDataset> {
    let fill_columns = opts
        .interpolate
        .iter()
        .map(|c| econ.column_index(c))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = merge_terms(econ, terms, opts.min_year);
    debug!(rows = rows.len(), "merged economic and term rows");

    let filled = fill_from_fallback(&mut rows, fallback);
    debug!(filled, "filled presidents from fallback terms");


    let last_observation = rows
        .iter()
        .rposition(|r| r.values.iter().any(Option::is_some));

    for &col in &fill_columns {
        let mut column: Vec<Option<f64>> = rows.iter().map(|r| r.values[col]).collect();
        fill_gaps(&mut column);
        for (row, v) in rows.iter_mut().zip(column) {
            row.values[col] = v;
        }
    }

    let keep = opts.trailing_trim.keep(rows.len(), last_observation);
    if keep < rows.len() {
        debug!(dropped = rows.len() - keep, policy = ?opts.trailing_trim, "trimming trailing rows");
        rows.truncate(keep);
    }

    let unmatched: Vec<MonthKey> = rows
        .iter()
        .filter(|r| r.president.is_none())
        .map(|r| r.key)
        .collect();
    if !unmatched.is_empty() {
        warn!(
            count = unmatched.len(),
            first = %unmatched[0],
            last = %unmatched[unmatched.len() - 1],
            "rows without a president"
        );
    }

    info!(rows = rows.len(), columns = econ.columns.len(), "reconciled dataset");
    Ok(ReconciledDataset {
        columns: econ.columns.clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        month::Month,
        presidents::{TermRecord, TermRow},
        series::{merge_series, Series, SeriesPoint},
    };

    fn gdp(points: &[(i32, Month, Option<f64>)]) -> EconTable {
        let s = Series {
            name: "GDP".into(),
            points: points
                .iter()
                .map(|&(y, m, value)| SeriesPoint {
                    key: MonthKey::new(y, m),
                    value,
                })
                .collect(),
        };
        merge_series(&[s]).unwrap()
    }

    fn no_trim() -> ReconcileOptions {
        ReconcileOptions {
            trailing_trim: TrailingTrim::None,
            ..ReconcileOptions::default()
        }
    }

    #[test]
    fn interpolates_march_gdp() {
        use Month::*;
        let econ = gdp(&[
            (2001, February, Some(100.0)),
            (2001, March, None),
            (2001, April, Some(104.0)),
        ]);
        let out = reconcile(&econ, &TermTable::default(), &TermIndex::fallback(), &no_trim()).unwrap();
        assert_eq!(out.column("GDP").unwrap(), vec![Some(100.0), Some(102.0), Some(104.0)]);
    }

    #[test]
    fn fallback_fills_truman_but_not_past_his_term() {
        use Month::*;
        let econ = gdp(&[(1952, December, Some(1.0)), (1953, January, Some(2.0))]);
        let index = TermIndex::new(vec![crate::presidents::TermRange {
            president: "Harry S Truman".into(),
            party: Some("Democratic".into()),
            start: MonthKey::new(1945, April),
            end: MonthKey::new(1953, January),
        }])
        .unwrap();
        let out = reconcile(&econ, &TermTable::default(), &index, &no_trim()).unwrap();
        assert_eq!(out.rows[0].president.as_deref(), Some("Harry S Truman"));
        assert_eq!(out.rows[0].party.as_deref(), Some("Democratic"));
        assert_eq!(out.rows[1].president, None);
    }

    #[test]
    fn scraped_president_is_kept_and_trimmed() {
        use Month::*;
        let econ = gdp(&[(1970, March, Some(1.0))]);
        let terms = TermTable {
            rows: vec![TermRow {
                key: MonthKey::new(1970, March),
                president: Some("  Richard Nixon ".into()),
                party: None,
            }],
        };
        let out = reconcile(&econ, &terms, &TermIndex::fallback(), &no_trim()).unwrap();
        assert_eq!(out.rows[0].president.as_deref(), Some("Richard Nixon"));
        assert_eq!(out.rows[0].party, None);
    }

    #[test]
    fn fallback_party_does_not_override_scraped() {
        use Month::*;
        let econ = gdp(&[(1950, June, Some(1.0))]);
        let terms = TermTable {
            rows: vec![TermRow {
                key: MonthKey::new(1950, June),
                president: None,
                party: Some("Dixiecrat ".into()),
            }],
        };
        let out = reconcile(&econ, &terms, &TermIndex::fallback(), &no_trim()).unwrap();
        assert_eq!(out.rows[0].president.as_deref(), Some("Harry S Truman"));
        assert_eq!(out.rows[0].party.as_deref(), Some("Dixiecrat"));
    }

    #[test]
    fn outer_join_filters_min_year_and_sorts() {
        use Month::*;
        let econ = gdp(&[(1947, December, Some(1.0)), (1948, March, Some(3.0))]);
        let terms = TermTable::from_records(
            &[TermRecord {
                president: Some("Gerald Ford".into()),
                party: Some("Republican".into()),
                start: MonthKey::new(1948, January),
                end: MonthKey::new(1948, May),
            }],
            1948,
        );
        let out = reconcile(&econ, &terms, &TermIndex::fallback(), &no_trim()).unwrap();
        let keys: Vec<_> = out.rows.iter().map(|r| r.key.month).collect();
        assert_eq!(keys, vec![January, February, March, April]);
        assert!(out.rows.iter().all(|r| r.key.year == 1948));
        // leading gap has nothing to carry; trailing gap carries March
        assert_eq!(out.column("GDP").unwrap(), vec![None, None, Some(3.0), Some(3.0)]);
    }

    #[test]
    fn default_trim_drops_last_two_rows() {
        use Month::*;
        let econ = gdp(&[
            (2000, January, Some(1.0)),
            (2000, February, Some(2.0)),
            (2000, March, Some(3.0)),
            (2000, April, Some(4.0)),
        ]);
        let out = reconcile(
            &econ,
            &TermTable::default(),
            &TermIndex::fallback(),
            &ReconcileOptions::default(),
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows[1].key, MonthKey::new(2000, February));
    }

    #[test]
    fn beyond_last_observation_trim() {
        use Month::*;
        let econ = gdp(&[(2000, January, Some(1.0))]);
        let terms = TermTable::from_records(
            &[TermRecord {
                president: Some("Bill Clinton".into()),
                party: None,
                start: MonthKey::new(2000, January),
                end: MonthKey::new(2000, April),
            }],
            1948,
        );
        let opts = ReconcileOptions {
            trailing_trim: TrailingTrim::BeyondLastObservation,
            ..ReconcileOptions::default()
        };
        let out = reconcile(&econ, &terms, &TermIndex::fallback(), &opts).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn missing_interpolation_column_is_error() {
        let econ = gdp(&[]);
        let opts = ReconcileOptions {
            interpolate: vec!["CPI".into()],
            ..ReconcileOptions::default()
        };
        assert!(matches!(
            reconcile(&econ, &TermTable::default(), &TermIndex::fallback(), &opts),
            Err(WrangleError::MissingColumn { .. })
        ));
    }

    #[test]
    fn reconcile_is_idempotent() {
        use Month::*;
        let econ = gdp(&[
            (1960, November, Some(1.0)),
            (1961, February, None),
            (1961, March, Some(5.0)),
        ]);
        let terms = TermTable::from_records(
            &[TermRecord {
                president: None,
                party: Some("Democratic".into()),
                start: MonthKey::new(1961, January),
                end: MonthKey::new(1961, June),
            }],
            1948,
        );
        let opts = ReconcileOptions::default();
        let a = reconcile(&econ, &terms, &TermIndex::fallback(), &opts).unwrap();
        let b = reconcile(&econ, &terms, &TermIndex::fallback(), &opts).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rows[1].president.as_deref(), Some("John F Kennedy"));
    }

    #[test]
    fn merged_rows_sorted_and_unique() {
        use Month::*;
        let econ = gdp(&[(1971, March, Some(1.0)), (1970, December, Some(2.0))]);
        let terms = TermTable::from_records(
            &[TermRecord {
                president: Some("Richard Nixon".into()),
                party: Some("Republican".into()),
                start: MonthKey::new(1970, November),
                end: MonthKey::new(1971, April),
            }],
            1948,
        );
        let rows = merge_terms(&econ, &terms, 1948);
        let keys: Vec<_> = rows.iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            vec![
                MonthKey::new(1970, November),
                MonthKey::new(1970, December),
                MonthKey::new(1971, January),
                MonthKey::new(1971, February),
                MonthKey::new(1971, March),
            ]
        );
        assert_eq!(rows[1].values, vec![Some(2.0)]);
    }

    #[test]
    fn keys_unique_after_reconcile() {
        use Month::*;
        let econ = gdp(&[(1990, May, Some(1.0)), (1990, June, Some(1.0))]);
        let terms = TermTable::from_records(
            &[TermRecord {
                president: Some("George Bush".into()),
                party: Some("Republican".into()),
                start: MonthKey::new(1990, May),
                end: MonthKey::new(1990, August),
            }],
            1948,
        );
        let out = reconcile(&econ, &terms, &TermIndex::fallback(), &no_trim()).unwrap();
        assert!(out.rows.windows(2).all(|w| w[0].key < w[1].key));
        assert_eq!(out.presidents(), vec!["George Bush"]);
    }
}
