use serde::Serialize;

use crate::{
    month::MonthKey,
    reconcile::{ReconciledDataset, ReconciledRow},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorChange {
    pub indicator: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearChange {
    pub year: i32,
    pub changes: Vec<IndicatorChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyTransition {
    pub previous_president: Option<String>,
    pub previous_party: Option<String>,
    /// None when either party is unknown.
    pub party_switched: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresidencySummary {
    pub president: String,
    pub party: Option<String>,
    pub first_month: MonthKey,
    pub last_month: MonthKey,
    pub months: usize,
    pub overall: Vec<IndicatorChange>,
    /// Change within the final calendar year, when it holds at least two months.
    pub last_year: Option<YearChange>,
    pub transition: PartyTransition,
}

fn changes(columns: &[String], first: &ReconciledRow, last: &ReconciledRow) -> Vec<IndicatorChange> {
    columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let (start, end) = (first.values[i], last.values[i]);
            IndicatorChange {
                indicator: name.clone(),
                start,
                end,
                change: start.zip(end).map(|(s, e)| e - s),
            }
        })
        .collect()
}

/// Start-to-end movement of every indicator under one president, plus the
/// party hand-over from whoever held the office just before. None if the
/// president never appears.
pub fn presidency_summary(dataset: &ReconciledDataset, president: &str) -> Option<PresidencySummary> {
    let is_theirs = |r: &ReconciledRow| r.president.as_deref() == Some(president);
    let first_idx = dataset.rows.iter().position(is_theirs)?;
    let rows: Vec<&ReconciledRow> = dataset.rows.iter().filter(|r| is_theirs(*r)).collect();
    let first = rows[0];
    let last = rows[rows.len() - 1];

    let final_year: Vec<&ReconciledRow> = rows
        .iter()
        .copied()
        .filter(|r| r.key.year == last.key.year)
        .collect();
    let last_year = (final_year.len() >= 2).then(|| YearChange {
        year: last.key.year,
        changes: changes(&dataset.columns, final_year[0], final_year[final_year.len() - 1]),
    });

    let party = rows.iter().find_map(|r| r.party.clone());
    let previous = dataset.rows[..first_idx]
        .iter()
        .rev()
        .find(|r| r.president.is_some() && !is_theirs(*r));
    let previous_party = previous.and_then(|r| r.party.clone());
    let party_switched = party
        .as_deref()
        .zip(previous_party.as_deref())
        .map(|(now, before)| now != before);

    Some(PresidencySummary {
        president: president.to_string(),
        party,
        first_month: first.key,
        last_month: last.key,
        months: rows.len(),
        overall: changes(&dataset.columns, first, last),
        last_year,
        transition: PartyTransition {
            previous_president: previous.and_then(|r| r.president.clone()),
            previous_party,
            party_switched,
        },
    })
}
