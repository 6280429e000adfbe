use std::env;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use rangeprobe_core::cli::{render_comparison, render_report, CliArgs, Commands};
use rangeprobe_core::{compare, run_with, RunConfig, NAME, VERSION};
use tracing::{debug, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_TARGETS: [&str; 3] = [
    "rangeprobe_core",
    "rangeprobe_extract",
    "rangeprobe_predicate",
];

fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();
    init_logging(args.log_level.as_deref())?;
    debug!("{} v{} starting", NAME, VERSION);

    match args.command {
        Commands::Run(run_args) => {
            let config = RunConfig::load(&run_args.config)
                .with_context(|| format!("loading {}", run_args.config.display()))?;
            let extractor = run_args.resolve_extractor(config.extractor);
            let report = run_with(&config, extractor)?;

            if run_args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Compare(compare_args) => {
            let config = RunConfig::load(&compare_args.config)
                .with_context(|| format!("loading {}", compare_args.config.display()))?;
            let comparison = compare(&config, &compare_args.extractors())?;

            if compare_args.json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                print!("{}", render_comparison(&comparison));
            }
            if comparison.agree {
                Ok(ExitCode::SUCCESS)
            } else {
                warn!("extractors returned different intervals");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

/// Log to stderr. `RUST_LOG` wins when set; otherwise `--log-level`, then
/// `RANGEPROBE_LOG`, then `info`, applied to this workspace's crates only.
fn init_logging(flag: Option<&str>) -> Result<()> {
    let filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let requested = match flag {
            Some(level) => level.to_string(),
            None => env::var("RANGEPROBE_LOG").unwrap_or_else(|_| "info".to_string()),
        };
        let level = Level::from_str(&requested)
            .map_err(|_| anyhow::anyhow!("invalid log level '{requested}'"))?;
        let level = level.as_str().to_ascii_lowercase();
        let directives = LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::try_new(directives).context("building log filter")?
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .context("installing log subscriber")?;
    Ok(())
}
