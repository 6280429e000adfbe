use crate::domain::AttributeDomain;
use crate::error::ExtractError;
use crate::interval::{IntervalSet, RunBuilder};
use crate::oracle::OracleError;

/// Exhaustive ascending scan over `domain`, probing every value exactly once.
///
/// This is the baseline the other extractors are checked against: it makes
/// no assumption about the oracle's shape.
pub fn extract_linear<P>(domain: AttributeDomain, mut probe: P) -> Result<IntervalSet, ExtractError>
where
    P: FnMut(i64) -> Result<bool, OracleError>,
{
    let mut runs = RunBuilder::new();
    if domain.is_empty() {
        return Ok(runs.finish());
    }
    for value in domain.min..=domain.max {
        runs.push(value, probe(value)?);
    }
    Ok(runs.finish())
}
