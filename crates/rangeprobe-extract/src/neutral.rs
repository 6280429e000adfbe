//! Neutral values for the attributes not under test.
//!
//! The orchestrator only ever consumes an explicit attribute → value map.
//! Callers either supply known-false values themselves or derive
//! out-of-domain sentinels here. Sentinels only neutralize a clause when the
//! oracle's comparisons are bounded to each attribute's domain.

use std::collections::BTreeMap;

use crate::domain::AttributeDomain;
use crate::error::ExtractError;

/// Attribute → value each non-target attribute is pinned to during a pass.
pub type NeutralValues = BTreeMap<String, i64>;

/// Build the `max + 1` sentinel for every listed attribute.
pub fn sentinels(
    attributes: &[String],
    domains: &BTreeMap<String, AttributeDomain>,
) -> Result<NeutralValues, ExtractError> {
    attributes
        .iter()
        .map(|attribute| {
            let domain = domains
                .get(attribute)
                .ok_or_else(|| ExtractError::MissingDomain {
                    attribute: attribute.clone(),
                })?;
            let sentinel = domain
                .sentinel()
                .ok_or_else(|| ExtractError::SentinelOverflow {
                    attribute: attribute.clone(),
                    max: domain.max,
                })?;
            Ok((attribute.clone(), sentinel))
        })
        .collect()
}
