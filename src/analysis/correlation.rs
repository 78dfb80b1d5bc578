use serde::Serialize;

use super::trends::DEFAULT_INDICATORS;
use crate::reconcile::ReconciledDataset;

/// Marks a vote-share column contributed by the election data.
pub const VOTE_COLUMN_MARKER: &str = "Percentage";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation of `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationSummary {
    pub econ_columns: Vec<String>,
    pub vote_columns: Vec<String>,
    pub matrix: CorrelationMatrix,
}

/// Pearson correlation over the rows where both sides are present. None with
/// fewer than two such rows or when either side is constant.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

pub fn correlation_matrix(dataset: &ReconciledDataset) -> CorrelationMatrix {
    let columns: Vec<Vec<Option<f64>>> = (0..dataset.columns.len())
        .map(|i| dataset.rows.iter().map(|r| r.values[i]).collect())
        .collect();
    let values = columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect();
    CorrelationMatrix {
        columns: dataset.columns.clone(),
        values,
    }
}

/// Correlations across every value column, with the economic and vote-share
/// columns named separately.
pub fn correlation_summary(dataset: &ReconciledDataset) -> CorrelationSummary {
    CorrelationSummary {
        econ_columns: dataset
            .columns
            .iter()
            .filter(|c| DEFAULT_INDICATORS.contains(&c.as_str()))
            .cloned()
            .collect(),
        vote_columns: dataset
            .columns
            .iter()
            .filter(|c| c.contains(VOTE_COLUMN_MARKER))
            .cloned()
            .collect(),
        matrix: correlation_matrix(dataset),
    }
}
