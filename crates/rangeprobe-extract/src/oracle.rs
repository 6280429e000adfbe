//! The oracle seam.
//!
//! An oracle answers one question: does the hidden predicate hold for this
//! full assignment? Extractors never look past that boolean. Determinism is
//! the caller's obligation and is not checked.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::assignment::Assignment;

/// Failure reported by an oracle during a probe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct OracleError {
    pub message: String,
}

impl OracleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A black-box boolean test over a full assignment.
pub trait Oracle {
    fn evaluate(&self, assignment: &Assignment) -> Result<bool, OracleError>;
}

impl<F> Oracle for F
where
    F: Fn(&Assignment) -> Result<bool, OracleError>,
{
    fn evaluate(&self, assignment: &Assignment) -> Result<bool, OracleError> {
        self(assignment)
    }
}

/// Adapts an infallible closure into an [`Oracle`].
#[derive(Debug, Clone, Copy)]
pub struct FnOracle<F>(pub F);

impl<F> Oracle for FnOracle<F>
where
    F: Fn(&Assignment) -> bool,
{
    fn evaluate(&self, assignment: &Assignment) -> Result<bool, OracleError> {
        Ok((self.0)(assignment))
    }
}

/// Wraps an oracle and counts every probe it answers.
///
/// The counter is atomic so the wrapper stays `Sync` whenever the inner
/// oracle is, and can be shared with the parallel extractor.
#[derive(Debug)]
pub struct CountingOracle<O> {
    inner: O,
    probes: AtomicU64,
}

impl<O> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            probes: AtomicU64::new(0),
        }
    }

    /// Total probes answered so far, successful or not.
    pub fn probes(&self) -> u64 {
        self.probes.load(Ordering::Relaxed)
    }

    /// Reset the counter, returning the value it held.
    pub fn reset(&self) -> u64 {
        self.probes.swap(0, Ordering::Relaxed)
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: Oracle> Oracle for CountingOracle<O> {
    fn evaluate(&self, assignment: &Assignment) -> Result<bool, OracleError> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        self.inner.evaluate(assignment)
    }
}
