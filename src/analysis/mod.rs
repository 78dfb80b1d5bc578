//! Read-only queries over a reconciled dataset. Results serialize to JSON for
//! the command line.

pub mod correlation;
pub mod presidency;
pub mod trends;

pub use correlation::{correlation_matrix, correlation_summary, pearson, CorrelationMatrix, CorrelationSummary};
pub use presidency::{presidency_summary, IndicatorChange, PartyTransition, PresidencySummary, YearChange};
pub use trends::{economic_trends, TermSelection, TrendRow, TrendSlice, DEFAULT_INDICATORS};
