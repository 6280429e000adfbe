//! Config loading, run harness and CLI plumbing for `rangeprobe`.

pub mod cli;
pub mod config;
pub mod run;

pub use config::{ConfigError, NeutralStrategy, RunConfig};
pub use run::{compare, run, run_oracle, run_with, ComparisonReport, RunError, RunReport};

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
