// src/presidents/extract.rs

//! Presidential terms from the scraped list-of-presidents table.
//!
//! Each table row becomes a [`TermRecord`] (name, party, start and end month)
//! and each record expands into one [`TermRow`] per month of tenure, start
//! inclusive and end exclusive. A row whose dates cannot be read is skipped
//! with a warning; a row whose name cannot be read keeps its months with a
//! null president. Neither aborts the batch.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{btree_map::Entry, BTreeMap};
use tracing::{debug, instrument, trace, warn};

use super::grid::first_table_grid;
use crate::{
    error::{Result, WrangleError},
    month::{Month, MonthKey},
    utils::clean_opt,
};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-z]+\W[A-Z][a-z]+)").expect("name regex"));
static MONTH_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-z]+)").expect("month word regex"));
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})").expect("year regex"));

/// Separator between the start and end date in the term column.
pub const TERM_SEPARATOR: char = '–';
/// End-date token for the sitting president.
pub const INCUMBENT_TOKEN: &str = "Incumbent";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Months before this year are dropped after expansion.
    pub min_year: i32,
    /// End year used when the end date carries none (still in office).
    pub default_end_year: i32,
    /// End month used when the end date reads "Incumbent".
    pub incumbent_end_month: Month,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_year: 1948,
            default_end_year: 2025,
            incumbent_end_month: Month::November,
        }
    }
}

/// One parsed row of the presidents table.
#[derive(Debug, Clone, PartialEq)]
pub struct TermRecord {
    pub president: Option<String>,
    pub party: Option<String>,
    pub start: MonthKey,
    /// Exclusive.
    pub end: MonthKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRow {
    pub key: MonthKey,
    pub president: Option<String>,
    pub party: Option<String>,
}

/// Month-by-month attribution, unique and sorted by `(Year, Month)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TermTable {
    pub rows: Vec<TermRow>,
}

impl TermTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: MonthKey) -> Option<&TermRow> {
        self.rows
            .binary_search_by_key(&key, |r| r.key)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Expand records into monthly rows. Where two records claim the same
    /// month the one that started later keeps it.
    pub fn from_records(records: &[TermRecord], min_year: i32) -> Self {
        let mut months: BTreeMap<MonthKey, (MonthKey, TermRow)> = BTreeMap::new();
        for rec in records {
            for row in expand_term(rec, min_year) {
                match months.entry(row.key) {
                    Entry::Vacant(e) => {
                        e.insert((rec.start, row));
                    }
                    Entry::Occupied(mut e) => {
                        let (held_since, held) = e.get();
                        if held == &row {
                            continue;
                        }
                        warn!(
                            month = %row.key,
                            held = ?held.president,
                            claimed = ?row.president,
                            "overlapping terms"
                        );
                        if rec.start > *held_since {
                            e.insert((rec.start, row));
                        }
                    }
                }
            }
        }
        Self {
            rows: months.into_values().map(|(_, row)| row).collect(),
        }
    }
}

/// One row per month in `[start, end)`, keeping only `Year >= min_year`.
pub fn expand_term(rec: &TermRecord, min_year: i32) -> Vec<TermRow> {
    MonthKey::range(rec.start, rec.end)
        .into_iter()
        .filter(|k| k.year >= min_year)
        .map(|key| TermRow {
            key,
            president: rec.president.clone(),
            party: rec.party.clone(),
        })
        .collect()
}

/// First two-word proper name, e.g. "Richard Nixon" out of
/// "Richard Nixon (1913–1994)". Middle initials break the pattern.
pub fn extract_president_name(cell: &str) -> Option<String> {
    NAME_RE
        .captures(cell)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn month_word(s: &str) -> Option<&str> {
    MONTH_WORD_RE.captures(s)?.get(1).map(|m| m.as_str())
}

fn year(s: &str) -> Option<i32> {
    YEAR_RE.captures(s)?.get(1)?.as_str().parse().ok()
}

/// Split "January 20, 2001 – January 20, 2009" into start and end months.
/// None when the start or end month cannot be read.
pub fn parse_term_dates(term: &str, opts: &ExtractOptions) -> Option<(MonthKey, MonthKey)> {
    let (start_text, end_text) = term.split_once(TERM_SEPARATOR)?;

    let start_month = Month::from_name(month_word(start_text)?)?;
    let start_year = year(start_text)?;

    let end_month = match month_word(end_text)? {
        INCUMBENT_TOKEN => opts.incumbent_end_month,
        word => Month::from_name(word)?,
    };
    let end_year = year(end_text).unwrap_or(opts.default_end_year);

    Some((
        MonthKey::new(start_year, start_month),
        MonthKey::new(end_year, end_month),
    ))
}

/// Parse one table row. Returns None (never an error) when the term dates
/// do not match.
pub fn parse_term_record(
    name_cell: &str,
    term_cell: &str,
    party_cell: &str,
    opts: &ExtractOptions,
) -> Option<TermRecord> {
    let (start, end) = parse_term_dates(term_cell, opts)?;
    Some(TermRecord {
        president: extract_president_name(name_cell),
        party: clean_opt(Some(party_cell)),
        start,
        end,
    })
}

/// Where the columns we need sit in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Columns {
    header_row: usize,
    name: usize,
    term: usize,
    party: usize,
}

fn locate_columns(grid: &[Vec<String>]) -> Result<Columns> {
    let header_row = grid
        .iter()
        .position(|row| row.iter().any(|c| c.starts_with("Term")))
        .ok_or_else(|| WrangleError::MissingHeader("Term".into()))?;
    let header = &grid[header_row];

    let first = |prefix: &str| {
        header
            .iter()
            .position(|c| c.starts_with(prefix))
            .ok_or_else(|| WrangleError::MissingHeader(prefix.to_string()))
    };
    let name = first("Name")?;
    let term = first("Term")?;
    // "Party" spans two columns: a colour swatch, then the name.
    let party = header
        .iter()
        .rposition(|c| c.starts_with("Party"))
        .ok_or_else(|| WrangleError::MissingHeader("Party".into()))?;

    Ok(Columns {
        header_row,
        name,
        term,
        party,
    })
}

/// Parse every row of the first table in `html` into term records.
pub fn extract_term_records(html: &str, opts: &ExtractOptions) -> Result<Vec<TermRecord>> {
    let grid = first_table_grid(html)?;
    let cols = locate_columns(&grid)?;
    debug!(?cols, "located president columns");

    fn cell(row: &[String], i: usize) -> &str {
        row.get(i).map(String::as_str).unwrap_or("")
    }
    let mut records = Vec::new();
    let mut unmatched = 0usize;
    for (i, row) in grid.iter().enumerate().skip(cols.header_row + 1) {
        match parse_term_record(
            cell(row, cols.name),
            cell(row, cols.term),
            cell(row, cols.party),
            opts,
        ) {
            Some(rec) => {
                if rec.president.is_none() {
                    warn!(row = i, name = cell(row, cols.name), "president name did not match");
                }
                trace!(row = i, ?rec, "parsed term");
                records.push(rec);
            }
            None => {
                unmatched += 1;
                warn!(row = i, term = cell(row, cols.term), "term dates did not match; skipping row");
            }
        }
    }
    debug!(records = records.len(), unmatched, "parsed term records");
    Ok(records)
}

/// Full term extraction: HTML in, monthly `(Year, Month, President, Party)` out.
#[instrument(level = "info", skip(html, opts), fields(html_len = html.len(), min_year = opts.min_year))]
pub fn extract_terms(html: &str, opts: &ExtractOptions) -> Result<TermTable> {
    let records = extract_term_records(html, opts)?;
    let table = TermTable::from_records(&records, opts.min_year);
    debug!(rows = table.len(), "expanded terms");
    Ok(table)
}
