use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};

use crate::{
    error::Result,
    month::Month,
    reconcile::ReconciledDataset,
};

pub const DEFAULT_INDICATORS: [&str; 3] = ["GDP", "CPI", "UNRATE"];

/// Which part of a presidency to slice, counted in calendar years of tenure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermSelection {
    #[default]
    Both,
    /// First four distinct years.
    First,
    /// Years five through eight.
    Second,
}

impl FromStr for TermSelection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" => Ok(TermSelection::Both),
            "first" => Ok(TermSelection::First),
            "second" => Ok(TermSelection::Second),
            other => Err(format!("unknown term {other:?} (expected both, first or second)")),
        }
    }
}

impl fmt::Display for TermSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TermSelection::Both => "both",
            TermSelection::First => "first",
            TermSelection::Second => "second",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub year: i32,
    pub month: Month,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSlice {
    pub president: String,
    pub term: TermSelection,
    pub indicators: Vec<String>,
    pub rows: Vec<TrendRow>,
}

/// Indicator values month by month for one president. Unknown indicators are
/// a `MissingColumn` error; an unknown president yields an empty slice.
pub fn economic_trends(
    dataset: &ReconciledDataset,
    president: &str,
    indicators: &[String],
    term: TermSelection,
) -> Result<TrendSlice> {
    let indicators: Vec<String> = if indicators.is_empty() {
        DEFAULT_INDICATORS.iter().map(|s| s.to_string()).collect()
    } else {
        indicators.to_vec()
    };
    let idx = indicators
        .iter()
        .map(|c| dataset.column_index(c))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = BTreeSet::new();
    let rows: Vec<_> = dataset
        .rows
        .iter()
        .filter(|r| r.president.as_deref() == Some(president))
        .filter(|r| seen.insert(r.key))
        .collect();

    let years: Vec<i32> = rows
        .iter()
        .map(|r| r.key.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let window: &[i32] = match term {
        TermSelection::Both => &years[..],
        TermSelection::First => &years[..years.len().min(4)],
        TermSelection::Second => &years[years.len().min(4)..years.len().min(8)],
    };

    Ok(TrendSlice {
        president: president.to_string(),
        term,
        rows: rows
            .into_iter()
            .filter(|r| window.contains(&r.key.year))
            .map(|r| TrendRow {
                year: r.key.year,
                month: r.key.month,
                values: idx.iter().map(|&i| r.values[i]).collect(),
            })
            .collect(),
        indicators,
    })
}
