use std::collections::BTreeMap;
use std::time::Instant;

use rangeprobe_extract::neutral::NeutralValues;
use rangeprobe_extract::{
    extract_all, CountingOracle, ExtractError, ExtractorKind, IntervalSet, Oracle,
};
use rangeprobe_predicate::{compile, CompileError};
use serde::Serialize;
use tracing::info;

use crate::config::{ConfigError, RunConfig};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("predicate error: {0}")]
    Compile(#[from] CompileError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// Outcome of one extractor over one config.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub extractor: ExtractorKind,
    pub results: BTreeMap<String, IntervalSet>,
    /// Oracle calls made during this run.
    pub probes: u64,
    pub elapsed_secs: f64,
}

/// Every extractor's report over the same config.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub reports: Vec<RunReport>,
    /// True when every extractor returned the same result map.
    pub agree: bool,
}

/// Run the config's own extractor against its compiled predicate.
pub fn run(config: &RunConfig) -> Result<RunReport, RunError> {
    run_with(config, config.extractor)
}

/// Like [`run`], overriding the extractor.
pub fn run_with(config: &RunConfig, extractor: ExtractorKind) -> Result<RunReport, RunError> {
    config.validate()?;
    let oracle = compile(&config.predicate, &config.domains)?;
    run_oracle(config, oracle, extractor)
}

/// Run against a caller-supplied oracle. `config.predicate` is ignored.
pub fn run_oracle<O>(
    config: &RunConfig,
    oracle: O,
    extractor: ExtractorKind,
) -> Result<RunReport, RunError>
where
    O: Oracle + Sync,
{
    let neutral = config.neutral_values()?;
    let counting = CountingOracle::new(oracle);
    execute(config, &neutral, &counting, extractor)
}

/// Run each extractor in turn on a fresh copy of `config.initial`.
pub fn compare(
    config: &RunConfig,
    extractors: &[ExtractorKind],
) -> Result<ComparisonReport, RunError> {
    config.validate()?;
    let neutral = config.neutral_values()?;
    let counting = CountingOracle::new(compile(&config.predicate, &config.domains)?);

    let reports = extractors
        .iter()
        .map(|&extractor| execute(config, &neutral, &counting, extractor))
        .collect::<Result<Vec<_>, _>>()?;
    let agree = reports
        .windows(2)
        .all(|pair| pair[0].results == pair[1].results);

    info!(extractors = reports.len(), agree, "comparison finished");
    Ok(ComparisonReport { reports, agree })
}

fn execute<O>(
    config: &RunConfig,
    neutral: &NeutralValues,
    oracle: &CountingOracle<O>,
    extractor: ExtractorKind,
) -> Result<RunReport, RunError>
where
    O: Oracle + Sync,
{
    oracle.reset();
    let mut assignment = config.initial.clone();

    let started = Instant::now();
    let results = extract_all(
        &mut assignment,
        &config.attributes,
        &config.domains,
        neutral,
        oracle,
        extractor,
    )?;
    let elapsed = started.elapsed();

    let probes = oracle.probes();
    info!(
        %extractor,
        attributes = results.len(),
        probes,
        elapsed_ms = elapsed.as_millis() as u64,
        "extraction finished"
    );

    Ok(RunReport {
        extractor,
        results,
        probes,
        elapsed_secs: elapsed.as_secs_f64(),
    })
}
