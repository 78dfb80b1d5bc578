// src/pipeline.rs

//! Load → merge → extract terms → reconcile → write.

use std::time::Instant;
use tracing::{info, instrument};

use crate::{
    config::{OutputConfig, PipelineConfig, PresidentsSource, FROM_ENV},
    error::{Result, WrangleError},
    output::{write_csv, write_parquet},
    presidents::{extract_terms, fetch_presidents_html, TermIndex},
    reconcile::{reconcile, ReconciledDataset},
    series::{load_series, merge_series},
};

/// The presidents page, from disk when `html_path` is set, else over HTTP.
pub fn presidents_html(source: &PresidentsSource) -> Result<String> {
    if let Some(path) = &source.html_path {
        info!(path = %path.display(), "reading presidents page from disk");
        return Ok(std::fs::read_to_string(path)?);
    }
    let from = source.from.as_deref().ok_or_else(|| {
        WrangleError::InvalidConfig(format!(
            "fetching {} needs presidents.from or {FROM_ENV}",
            source.url
        ))
    })?;
    fetch_presidents_html(&source.url, &source.user_agent, from)
}

/// Build the reconciled dataset without writing anything.
#[instrument(level = "info", skip_all)]
pub fn build_dataset(cfg: &PipelineConfig) -> Result<ReconciledDataset> {
    let series = cfg
        .series_specs()
        .map(|(path, spec)| load_series(path, spec))
        .collect::<Result<Vec<_>>>()?;
    let econ = merge_series(&series)?;

    let html = presidents_html(&cfg.presidents)?;
    let terms = extract_terms(&html, &cfg.extract_options())?;

    reconcile(&econ, &terms, &TermIndex::fallback(), &cfg.reconcile_options())
}

pub fn write_outputs(output: &OutputConfig, dataset: &ReconciledDataset) -> Result<()> {
    if let Some(path) = &output.csv {
        write_csv(path, dataset)?;
    }
    if let Some(path) = &output.parquet {
        write_parquet(path, dataset)?;
    }
    Ok(())
}

pub fn run(cfg: &PipelineConfig) -> Result<ReconciledDataset> {
    let t0 = Instant::now();
    let dataset = build_dataset(cfg)?;
    write_outputs(&cfg.output, &dataset)?;
    info!(
        rows = dataset.len(),
        presidents = dataset.presidents().len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "pipeline complete"
    );
    Ok(dataset)
}
