use serde::Deserialize;

/// What to cut off the end of the sorted dataset.
///
/// The joined table has historically ended with two artifact rows (months
/// with term data but no economic data yet), so the default drops exactly
/// two. `BeyondLastObservation` derives the cut from the data instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingTrim {
    /// Drop this many rows, unconditionally.
    Fixed(usize),
    /// Drop rows after the last one with any economic observation, judged
    /// before gap filling.
    BeyondLastObservation,
    None,
}

pub const DEFAULT_TRAILING_ROWS: usize = 2;

impl Default for TrailingTrim {
    fn default() -> Self {
        TrailingTrim::Fixed(DEFAULT_TRAILING_ROWS)
    }
}

impl TrailingTrim {
    /// Number of rows to keep out of `len`. `last_observation` is the index
    /// of the last row that had an observed value.
    pub fn keep(self, len: usize, last_observation: Option<usize>) -> usize {
        match self {
            TrailingTrim::Fixed(n) => len.saturating_sub(n),
            TrailingTrim::BeyondLastObservation => last_observation.map_or(0, |i| (i + 1).min(len)),
            TrailingTrim::None => len,
        }
    }
}
