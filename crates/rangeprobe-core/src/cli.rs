use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rangeprobe_extract::parallel::DEFAULT_MAX_WORKERS;
use rangeprobe_extract::ExtractorKind;

use crate::run::{ComparisonReport, RunReport};

/// Recover per-attribute true-runs of a predicate by probing it.
#[derive(Parser, Debug)]
#[command(name = "rangeprobe", version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        help = "Log level (trace, debug, info, warn, error); falls back to RANGEPROBE_LOG"
    )]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Extract intervals with one extractor")]
    Run(RunArgs),

    #[command(
        about = "Run every extractor and check they agree",
        long_about = "Runs the recursive, linear and parallel extractors on the same config. \
                      Exits with status 1 if their results differ."
    )]
    Compare(CompareArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(value_name = "CONFIG", help = "Path to a JSON run config")]
    pub config: PathBuf,

    #[arg(
        short = 'e',
        long,
        value_enum,
        help = "Extractor to use (defaults to the config's)"
    )]
    pub extractor: Option<ExtractorArg>,

    #[arg(
        short = 'w',
        long,
        value_name = "N",
        help = "Worker threads for the parallel extractor"
    )]
    pub workers: Option<usize>,

    #[arg(long, help = "Print the report as JSON")]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    #[arg(value_name = "CONFIG", help = "Path to a JSON run config")]
    pub config: PathBuf,

    #[arg(
        short = 'w',
        long,
        value_name = "N",
        help = "Worker threads for the parallel extractor"
    )]
    pub workers: Option<usize>,

    #[arg(long, help = "Print the report as JSON")]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorArg {
    Recursive,
    Linear,
    Parallel,
}

impl RunArgs {
    /// The extractor to run: the flag if given, else the config's, with
    /// `--workers` applied to a parallel choice either way.
    pub fn resolve_extractor(&self, configured: ExtractorKind) -> ExtractorKind {
        match (self.extractor, configured) {
            (Some(ExtractorArg::Recursive), _) => ExtractorKind::Recursive,
            (Some(ExtractorArg::Linear), _) => ExtractorKind::Linear,
            (Some(ExtractorArg::Parallel), _) => ExtractorKind::Parallel {
                max_workers: self.workers.unwrap_or(DEFAULT_MAX_WORKERS),
            },
            (None, ExtractorKind::Parallel { max_workers }) => ExtractorKind::Parallel {
                max_workers: self.workers.unwrap_or(max_workers),
            },
            (None, other) => other,
        }
    }
}

impl CompareArgs {
    pub fn extractors(&self) -> [ExtractorKind; 3] {
        [
            ExtractorKind::Recursive,
            ExtractorKind::Linear,
            ExtractorKind::Parallel {
                max_workers: self.workers.unwrap_or(DEFAULT_MAX_WORKERS),
            },
        ]
    }
}

/// Human-readable rendering of a single run.
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "extractor: {}  probes: {}  elapsed: {:.6}s",
        report.extractor, report.probes, report.elapsed_secs
    );
    for (attribute, runs) in &report.results {
        let _ = writeln!(out, "  {attribute}: {runs}");
    }
    out
}

pub fn render_comparison(comparison: &ComparisonReport) -> String {
    let mut out = String::new();
    for report in &comparison.reports {
        out.push_str(&render_report(report));
    }
    let verdict = if comparison.agree {
        "all extractors agree"
    } else {
        "EXTRACTORS DISAGREE"
    };
    let _ = writeln!(out, "{verdict}");
    out
}
