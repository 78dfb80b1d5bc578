// src/config.rs

//! YAML pipeline configuration.
//!
//! ```yaml
//! series:
//!   - { path: data/GDP.csv, value_col: GDP }
//!   - { path: data/CPI.csv, value_col: CPI, rename_from: CPIAUCSL }
//! presidents:
//!   from: someone@example.org
//! output:
//!   csv: out/economic_election_data.csv
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::{
    error::{Result, WrangleError},
    month::Month,
    presidents::{ExtractOptions, PRESIDENTS_URL},
    reconcile::{ReconcileOptions, TrailingTrim},
    series::SeriesSpec,
};

pub const USER_AGENT_ENV: &str = "ECONVOTE_USER_AGENT";
pub const FROM_ENV: &str = "ECONVOTE_FROM";

fn default_user_agent() -> String {
    concat!("econvote/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_url() -> String {
    PRESIDENTS_URL.to_string()
}

fn default_min_year() -> i32 {
    1948
}

fn default_interpolate() -> Vec<String> {
    vec!["GDP".to_string()]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesConfig {
    pub path: PathBuf,
    #[serde(flatten)]
    pub spec: SeriesSpec,
}

/// Where the presidents table comes from. A local `html_path` wins over
/// fetching `url`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresidentsSource {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub html_path: Option<PathBuf>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Contact address sent in the `From` header.
    #[serde(default)]
    pub from: Option<String>,
}

impl Default for PresidentsSource {
    fn default() -> Self {
        Self {
            url: default_url(),
            html_path: None,
            user_agent: default_user_agent(),
            from: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub csv: Option<PathBuf>,
    #[serde(default)]
    pub parquet: Option<PathBuf>,
}

/// Stand-in end date for the sitting president's term.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct IncumbentEnd {
    pub year: i32,
    pub month: Month,
}

impl Default for IncumbentEnd {
    fn default() -> Self {
        let opts = ExtractOptions::default();
        Self {
            year: opts.default_end_year,
            month: opts.incumbent_end_month,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineConfig {
    pub series: Vec<SeriesConfig>,
    #[serde(default)]
    pub presidents: PresidentsSource,
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    #[serde(default = "default_interpolate")]
    pub interpolate: Vec<String>,
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub trailing_trim: TrailingTrim,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub incumbent_end: IncumbentEnd,
}

impl PipelineConfig {
    /// Parse without touching paths or the environment.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let cfg: PipelineConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a config file, resolve its relative paths against the file's
    /// directory and apply the identity overrides from the environment.
    #[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let mut cfg = Self::from_yaml(&text)?;
        if let Some(base) = path.as_ref().parent() {
            cfg.resolve_paths(base);
        }
        cfg.apply_overrides(
            std::env::var(USER_AGENT_ENV).ok(),
            std::env::var(FROM_ENV).ok(),
        );
        debug!(series = cfg.series.len(), "loaded config");
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.series.is_empty() {
            return Err(WrangleError::InvalidConfig("no series configured".into()));
        }
        if let Some(bad) = self.series.iter().find(|s| s.spec.value_col.trim().is_empty()) {
            return Err(WrangleError::InvalidConfig(format!(
                "series {} has an empty value_col",
                bad.path.display()
            )));
        }
        Ok(())
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for s in &mut self.series {
            resolve(&mut s.path);
        }
        if let Some(p) = self.presidents.html_path.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.output.csv.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.output.parquet.as_mut() {
            resolve(p);
        }
    }

    pub fn apply_overrides(&mut self, user_agent: Option<String>, from: Option<String>) {
        if let Some(ua) = user_agent.filter(|s| !s.trim().is_empty()) {
            self.presidents.user_agent = ua;
        }
        if let Some(from) = from.filter(|s| !s.trim().is_empty()) {
            self.presidents.from = Some(from);
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            min_year: self.min_year,
            default_end_year: self.incumbent_end.year,
            incumbent_end_month: self.incumbent_end.month,
        }
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            min_year: self.min_year,
            interpolate: self.interpolate.clone(),
            trailing_trim: self.trailing_trim,
        }
    }

    pub fn series_specs(&self) -> impl Iterator<Item = (&Path, &SeriesSpec)> {
        self.series.iter().map(|s| (s.path.as_path(), &s.spec))
    }
}
