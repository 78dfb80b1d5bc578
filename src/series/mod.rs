pub mod date_parser;
pub mod merge;
pub mod normalize;
pub mod raw_table;

pub use merge::{merge_series, EconRow, EconTable};
pub use normalize::{load_series, normalize_series, Series, SeriesPoint, SeriesSpec};
pub use raw_table::RawTable;
