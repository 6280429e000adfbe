//! Multi-attribute driver.
//!
//! Runs one single-attribute extractor per listed attribute. Before each
//! pass, every other listed attribute is pinned to its neutral value so the
//! oracle's answer depends only on the attribute under test. This assumes
//! the hidden predicate is a disjunction of independent per-attribute
//! clauses; correlated attributes are out of reach.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assignment::Assignment;
use crate::domain::AttributeDomain;
use crate::error::ExtractError;
use crate::interval::IntervalSet;
use crate::linear::extract_linear;
use crate::neutral::NeutralValues;
use crate::oracle::Oracle;
use crate::parallel::{extract_parallel, DEFAULT_MAX_WORKERS};
use crate::recursive::extract_recursive;

/// Which single-attribute extractor to run per pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractorKind {
    #[default]
    Recursive,
    Linear,
    Parallel {
        #[serde(default = "default_max_workers")]
        max_workers: usize,
    },
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

impl ExtractorKind {
    /// Parallel extraction with [`DEFAULT_MAX_WORKERS`].
    pub fn parallel() -> Self {
        ExtractorKind::Parallel {
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExtractorKind::Recursive => "recursive",
            ExtractorKind::Linear => "linear",
            ExtractorKind::Parallel { .. } => "parallel",
        }
    }
}

impl std::fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractorKind::Parallel { max_workers } => write!(f, "parallel({max_workers})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Extract the true-runs of every attribute in `attributes`.
///
/// Every attribute must have an entry in both `domains` and `neutral`; this
/// is checked for the whole list before the first probe. Passes run in the
/// given order and each one overwrites the neutral slots left by the
/// previous pass. On return `assignment` holds the state of the last pass.
///
/// Single-threaded extractors probe by writing into `assignment` directly.
/// The parallel extractor reads it as a base and gives every probe its own
/// snapshot.
pub fn extract_all<O>(
    assignment: &mut Assignment,
    attributes: &[String],
    domains: &BTreeMap<String, AttributeDomain>,
    neutral: &NeutralValues,
    oracle: &O,
    extractor: ExtractorKind,
) -> Result<BTreeMap<String, IntervalSet>, ExtractError>
where
    O: Oracle + Sync + ?Sized,
{
    validate_plan(attributes, domains, neutral)?;

    let mut results = BTreeMap::new();
    for attribute in attributes {
        for other in attributes.iter().filter(|other| *other != attribute) {
            assignment.set(other, neutral[other]);
        }

        let domain = domains[attribute];
        debug!(attribute = %attribute, %domain, %extractor, "extracting attribute");

        let runs = match extractor {
            ExtractorKind::Recursive => extract_recursive(domain, |value| {
                assignment.set(attribute, value);
                oracle.evaluate(assignment)
            })?,
            ExtractorKind::Linear => extract_linear(domain, |value| {
                assignment.set(attribute, value);
                oracle.evaluate(assignment)
            })?,
            ExtractorKind::Parallel { max_workers } => {
                let base: &Assignment = assignment;
                extract_parallel(domain, max_workers, |value| {
                    oracle.evaluate(&base.with_value(attribute, value))
                })?
            }
        };

        debug!(attribute = %attribute, runs = runs.len(), "attribute extracted");
        results.insert(attribute.clone(), runs);
    }
    Ok(results)
}

/// Fail fast on attributes with no domain or no neutral value.
fn validate_plan(
    attributes: &[String],
    domains: &BTreeMap<String, AttributeDomain>,
    neutral: &NeutralValues,
) -> Result<(), ExtractError> {
    for attribute in attributes {
        if !domains.contains_key(attribute) {
            return Err(ExtractError::MissingDomain {
                attribute: attribute.clone(),
            });
        }
        if !neutral.contains_key(attribute) {
            return Err(ExtractError::MissingNeutral {
                attribute: attribute.clone(),
            });
        }
    }
    Ok(())
}
