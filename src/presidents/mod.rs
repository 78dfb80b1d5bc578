pub mod extract;
pub mod fallback;
pub mod fetch;
pub mod grid;

pub use extract::{extract_terms, ExtractOptions, TermRecord, TermRow, TermTable};
pub use fallback::{FallbackTerm, TermIndex, TermRange, FALLBACK_TERMS};
pub use fetch::{fetch_presidents_html, fetch_with_timeout, FETCH_TIMEOUT, PRESIDENTS_URL};
