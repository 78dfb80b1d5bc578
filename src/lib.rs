pub mod analysis;
pub mod config;
pub mod error;
pub mod month;
pub mod output;
pub mod pipeline;
pub mod presidents;
pub mod reconcile;
pub mod series;
pub mod utils;

pub use error::{Result, WrangleError};
pub use month::{Month, MonthKey};
pub use reconcile::{ReconciledDataset, ReconciledRow};
