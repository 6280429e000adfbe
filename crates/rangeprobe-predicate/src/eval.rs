use rangeprobe_extract::{Assignment, OracleError};

use crate::expr::Predicate;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("attribute '{attribute}' has no value in the assignment")]
    Unassigned { attribute: String },
}

impl From<EvalError> for OracleError {
    fn from(err: EvalError) -> Self {
        OracleError::new(err.to_string())
    }
}

/// Evaluate a predicate against an assignment.
///
/// `And`/`Or` short-circuit left to right, so an unassigned attribute in a
/// term that is never reached does not fail the evaluation.
pub fn eval_predicate(predicate: &Predicate, assignment: &Assignment) -> Result<bool, EvalError> {
    match predicate {
        Predicate::Comparison {
            attribute,
            op,
            value,
        } => Ok(op.apply(lookup(attribute, assignment)?, *value)),
        Predicate::Range {
            attribute,
            start,
            end,
        } => {
            let current = lookup(attribute, assignment)?;
            Ok((*start..=*end).contains(&current))
        }
        Predicate::And { terms } => {
            for term in terms {
                if !eval_predicate(term, assignment)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Predicate::Or { terms } => {
            for term in terms {
                if eval_predicate(term, assignment)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn lookup(attribute: &str, assignment: &Assignment) -> Result<i64, EvalError> {
    assignment
        .get(attribute)
        .ok_or_else(|| EvalError::Unassigned {
            attribute: attribute.to_string(),
        })
}
