use std::collections::BTreeMap;

use rangeprobe_extract::{Assignment, AttributeDomain, Oracle, OracleError};

use crate::bound::bound_predicate;
use crate::eval::eval_predicate;
use crate::expr::Predicate;
use crate::parse::{parse_predicate, ParseError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("predicate parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("predicate references attribute '{attribute}' with no domain")]
    UnknownAttribute { attribute: String },
}

/// A parsed, domain-bounded predicate, ready to serve as an oracle.
#[derive(Debug, Clone)]
pub struct CompiledPredicate {
    source: String,
    predicate: Predicate,
}

impl CompiledPredicate {
    /// The text this predicate was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The bounded tree the oracle evaluates.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl Oracle for CompiledPredicate {
    fn evaluate(&self, assignment: &Assignment) -> Result<bool, OracleError> {
        Ok(eval_predicate(&self.predicate, assignment)?)
    }
}

/// Parse `text` and bound every clause to `domains`.
pub fn compile(
    text: &str,
    domains: &BTreeMap<String, AttributeDomain>,
) -> Result<CompiledPredicate, CompileError> {
    let parsed = parse_predicate(text)?;
    Ok(CompiledPredicate {
        source: text.to_string(),
        predicate: bound_predicate(&parsed, domains)?,
    })
}

/// Bound an already-built tree, for callers that construct predicates
/// directly or load them from JSON.
pub fn compile_predicate(
    predicate: &Predicate,
    domains: &BTreeMap<String, AttributeDomain>,
) -> Result<CompiledPredicate, CompileError> {
    Ok(CompiledPredicate {
        source: predicate.to_string(),
        predicate: bound_predicate(predicate, domains)?,
    })
}
