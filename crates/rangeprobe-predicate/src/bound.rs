//! Domain bounding.
//!
//! An open comparison such as `A < 20` is satisfiable by values outside the
//! attribute's domain, which would let an out-of-domain sentinel satisfy
//! the clause. Every comparison is rewritten to an inclusive range clipped
//! to the domain (`A < 500` over `[1, 100]` becomes `A BETWEEN 1 AND 100`,
//! `A > 20` becomes `A BETWEEN 21 AND 100`), and every BETWEEN is clipped
//! the same way. A clause with no value left in the domain becomes an empty
//! range.

use std::collections::BTreeMap;

use rangeprobe_extract::AttributeDomain;

use crate::compile::CompileError;
use crate::expr::{CmpOp, Predicate};

pub fn bound_predicate(
    predicate: &Predicate,
    domains: &BTreeMap<String, AttributeDomain>,
) -> Result<Predicate, CompileError> {
    match predicate {
        Predicate::Comparison {
            attribute,
            op,
            value,
        } => {
            let domain = domain_of(attribute, domains)?;
            // `None` means no i64 satisfies the comparison.
            let (start, end) = match op {
                CmpOp::Lt => (Some(domain.min), value.checked_sub(1)),
                CmpOp::Lte => (Some(domain.min), Some(*value)),
                CmpOp::Gt => (value.checked_add(1), Some(domain.max)),
                CmpOp::Gte => (Some(*value), Some(domain.max)),
                CmpOp::Eq => (Some(*value), Some(*value)),
            };
            Ok(match (start, end) {
                (Some(start), Some(end)) => clipped(attribute, start, end, domain),
                _ => empty(attribute),
            })
        }
        Predicate::Range {
            attribute,
            start,
            end,
        } => {
            let domain = domain_of(attribute, domains)?;
            Ok(clipped(attribute, *start, *end, domain))
        }
        Predicate::And { terms } => Ok(Predicate::and(
            terms
                .iter()
                .map(|t| bound_predicate(t, domains))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Predicate::Or { terms } => Ok(Predicate::or(
            terms
                .iter()
                .map(|t| bound_predicate(t, domains))
                .collect::<Result<Vec<_>, _>>()?,
        )),
    }
}

fn clipped(attribute: &str, start: i64, end: i64, domain: AttributeDomain) -> Predicate {
    let (start, end) = (start.max(domain.min), end.min(domain.max));
    if start > end {
        return empty(attribute);
    }
    Predicate::range(attribute, start, end)
}

/// A range no value satisfies.
fn empty(attribute: &str) -> Predicate {
    Predicate::range(attribute, 1, 0)
}

fn domain_of(
    attribute: &str,
    domains: &BTreeMap<String, AttributeDomain>,
) -> Result<AttributeDomain, CompileError> {
    domains
        .get(attribute)
        .copied()
        .ok_or_else(|| CompileError::UnknownAttribute {
            attribute: attribute.to_string(),
        })
}
