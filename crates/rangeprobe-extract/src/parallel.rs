//! Exhaustive scan on a bounded rayon pool.
//!
//! Every value of the domain is probed concurrently, `max_workers` at a
//! time. Outcomes are collected by position, never by completion order, so
//! the run-length pass sees the same ascending sequence the linear scan
//! would. The domain is walked in fixed-size chunks to keep the outcome
//! buffer bounded on very wide domains.

use rayon::prelude::*;

use crate::domain::AttributeDomain;
use crate::error::ExtractError;
use crate::interval::{IntervalSet, RunBuilder};
use crate::oracle::OracleError;

/// Worker count used when the caller does not choose one.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Values probed per parallel batch.
const CHUNK_LEN: i64 = 1 << 16;

/// Concurrent counterpart of [`crate::linear::extract_linear`].
///
/// `probe` is shared by reference across workers, so it must not mutate
/// shared state; callers build a fresh assignment snapshot inside it. The
/// first failing probe aborts the whole call and no partial set is returned.
pub fn extract_parallel<P>(
    domain: AttributeDomain,
    max_workers: usize,
    probe: P,
) -> Result<IntervalSet, ExtractError>
where
    P: Fn(i64) -> Result<bool, OracleError> + Sync,
{
    if max_workers == 0 {
        return Err(ExtractError::InvalidWorkerCount(max_workers));
    }
    let mut runs = RunBuilder::new();
    if domain.is_empty() {
        return Ok(runs.finish());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers)
        .thread_name(|i| format!("rangeprobe-probe-{i}"))
        .build()?;

    let mut chunk_start = domain.min;
    loop {
        let chunk_end = chunk_start
            .checked_add(CHUNK_LEN - 1)
            .map_or(domain.max, |end| end.min(domain.max));

        // Offsets keep the iterator indexed, so collection is positional.
        let len = (chunk_end - chunk_start + 1) as usize;
        let outcomes: Vec<bool> = pool.install(|| {
            (0..len)
                .into_par_iter()
                .map(|offset| probe(chunk_start + offset as i64))
                .collect::<Result<Vec<_>, _>>()
        })?;

        for (value, holds) in (chunk_start..=chunk_end).zip(outcomes) {
            runs.push(value, holds);
        }

        if chunk_end == domain.max {
            break;
        }
        chunk_start = chunk_end + 1;
    }

    Ok(runs.finish())
}
