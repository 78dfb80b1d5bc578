// src/presidents/fallback.rs

//! Hardcoded presidential terms for the span the scraped table gets wrong.
//!
//! The list-of-presidents table writes 1945–1969 presidents with middle
//! initials ("Harry S. Truman"), which the two-word name pattern cannot read,
//! so those months come out of extraction without a president. This table
//! fills them. Ranges are start-inclusive, end-exclusive.

use crate::{
    error::{Result, WrangleError},
    month::{Month, MonthKey},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackTerm {
    pub president: &'static str,
    pub party: &'static str,
    pub start: MonthKey,
    pub end: MonthKey,
}

const fn key(year: i32, month: Month) -> MonthKey {
    MonthKey { year, month }
}

pub const FALLBACK_TERMS: [FallbackTerm; 4] = [
    FallbackTerm {
        president: "Harry S Truman",
        party: "Democratic",
        start: key(1945, Month::April),
        end: key(1953, Month::January),
    },
    FallbackTerm {
        president: "Dwight D Eisenhower",
        party: "Republican",
        start: key(1953, Month::January),
        end: key(1961, Month::January),
    },
    FallbackTerm {
        president: "John F Kennedy",
        party: "Democratic",
        start: key(1961, Month::January),
        end: key(1963, Month::November),
    },
    FallbackTerm {
        president: "Lyndon B Johnson",
        party: "Democratic",
        start: key(1963, Month::November),
        end: key(1969, Month::January),
    },
];

/// A labelled `[start, end)` month interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRange {
    pub president: String,
    pub party: Option<String>,
    pub start: MonthKey,
    pub end: MonthKey,
}

impl TermRange {
    pub fn contains(&self, key: MonthKey) -> bool {
        self.start <= key && key < self.end
    }
}

impl From<&FallbackTerm> for TermRange {
    fn from(t: &FallbackTerm) -> Self {
        Self {
            president: t.president.to_string(),
            party: Some(t.party.to_string()),
            start: t.start,
            end: t.end,
        }
    }
}

/// Sorted, disjoint term ranges with a containment lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermIndex {
    ranges: Vec<TermRange>,
}

impl TermIndex {
    /// Fails if a range is empty or overlaps its neighbour once sorted.
    pub fn new(mut ranges: Vec<TermRange>) -> Result<Self> {
        ranges.sort_by_key(|r| r.start);
        for r in &ranges {
            if r.start >= r.end {
                return Err(WrangleError::OverlappingTerms(r.president.clone()));
            }
        }
        for pair in ranges.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(WrangleError::OverlappingTerms(pair[1].president.clone()));
            }
        }
        Ok(Self { ranges })
    }

    /// Index over [`FALLBACK_TERMS`].
    pub fn fallback() -> Self {
        Self {
            ranges: FALLBACK_TERMS.iter().map(TermRange::from).collect(),
        }
    }

    /// The range containing `key`, if any.
    pub fn lookup(&self, key: MonthKey) -> Option<&TermRange> {
        let after = self.ranges.partition_point(|r| r.start <= key);
        let candidate = self.ranges.get(after.checked_sub(1)?)?;
        candidate.contains(key).then_some(candidate)
    }
}
