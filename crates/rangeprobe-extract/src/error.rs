use crate::oracle::OracleError;

/// Errors surfaced by the extractors and the orchestrator.
///
/// No variant carries a partial result: an extraction either completes or
/// fails as a whole.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("oracle failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("attribute '{attribute}' has no domain")]
    MissingDomain { attribute: String },

    #[error("attribute '{attribute}' has no neutral value")]
    MissingNeutral { attribute: String },

    #[error("attribute '{attribute}' has no sentinel above its domain (max = {max})")]
    SentinelOverflow { attribute: String, max: i64 },

    #[error("parallel extraction needs at least one worker, got {0}")]
    InvalidWorkerCount(usize),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
