//! Midpoint-first divide and conquer over one attribute's domain.
//!
//! Each call probes the midpoint of `[lo, hi]`:
//! - false: the midpoint is excluded and both halves are searched
//!   independently.
//! - true: the run containing the midpoint is grown one step at a time in
//!   each direction, recorded, and the two leftover flanks are searched for
//!   further runs.
//!
//! A false midpoint does not say which side holds a run, so both halves are
//! always searched and every value ends up probed. Values next to a run are
//! probed twice: once while growing the run, once by the flank search.

use tracing::trace;

use crate::domain::AttributeDomain;
use crate::error::ExtractError;
use crate::interval::{Interval, IntervalSet};
use crate::oracle::OracleError;

/// Extract every maximal true-run of `probe` over `domain`.
///
/// `probe(v)` answers whether the oracle holds with the target attribute set
/// to `v`. No value outside `domain` is ever probed.
pub fn extract_recursive<P>(
    domain: AttributeDomain,
    mut probe: P,
) -> Result<IntervalSet, ExtractError>
where
    P: FnMut(i64) -> Result<bool, OracleError>,
{
    let mut found = Vec::new();
    search(domain.min, domain.max, &mut probe, &mut found)?;
    Ok(IntervalSet::from_unsorted(found))
}

fn search<P>(lo: i64, hi: i64, probe: &mut P, found: &mut Vec<Interval>) -> Result<(), ExtractError>
where
    P: FnMut(i64) -> Result<bool, OracleError>,
{
    if lo > hi {
        return Ok(());
    }

    let mid = midpoint(lo, hi);
    if !probe(mid)? {
        if mid > lo {
            search(lo, mid - 1, probe, found)?;
        }
        if mid < hi {
            search(mid + 1, hi, probe, found)?;
        }
        return Ok(());
    }

    let mut start = mid;
    while start > lo && probe(start - 1)? {
        start -= 1;
    }
    let mut end = mid;
    while end < hi && probe(end + 1)? {
        end += 1;
    }

    trace!(start, end, "true-run found");
    found.push(Interval::new(start, end));

    if start > lo {
        search(lo, start - 1, probe, found)?;
    }
    if end < hi {
        search(end + 1, hi, probe, found)?;
    }
    Ok(())
}

/// `floor((lo + hi) / 2)` without overflowing at the ends of `i64`.
fn midpoint(lo: i64, hi: i64) -> i64 {
    ((lo as i128 + hi as i128).div_euclid(2)) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(min: i64, max: i64, holds: impl Fn(i64) -> bool) -> IntervalSet {
        extract_recursive(AttributeDomain::new(min, max), |v| Ok(holds(v))).unwrap()
    }

    #[test]
    fn test_midpoint_floors() {
        assert_eq!(midpoint(1, 100), 50);
        assert_eq!(midpoint(-3, 0), -2);
        assert_eq!(midpoint(i64::MIN, i64::MAX), -1);
        assert_eq!(midpoint(i64::MAX - 1, i64::MAX), i64::MAX - 1);
    }

    #[test]
    fn test_single_point_domain() {
        assert_eq!(extract(4, 4, |_| true).as_slice(), &[Interval::new(4, 4)]);
        assert!(extract(4, 4, |_| false).is_empty());
    }

    #[test]
    fn test_never_probes_outside_domain() {
        let mut probed = Vec::new();
        let set = extract_recursive(AttributeDomain::new(10, 20), |v| {
            probed.push(v);
            Ok(true)
        })
        .unwrap();

        assert_eq!(set.as_slice(), &[Interval::new(10, 20)]);
        assert!(probed.iter().all(|v| (10..=20).contains(v)));
    }

    #[test]
    fn test_extremes_of_i64() {
        let set = extract(i64::MAX - 3, i64::MAX, |v| v >= i64::MAX - 1);
        assert_eq!(set.as_slice(), &[Interval::new(i64::MAX - 1, i64::MAX)]);

        let set = extract(i64::MIN, i64::MIN + 3, |v| v == i64::MIN);
        assert_eq!(set.as_slice(), &[Interval::new(i64::MIN, i64::MIN)]);
    }

    #[test]
    fn test_probe_budget() {
        let mut probes = 0u64;
        let set = extract_recursive(AttributeDomain::new(1, 10_000), |v| {
            probes += 1;
            Ok((5_000..=5_010).contains(&v) || v == 9_000)
        })
        .unwrap();

        assert_eq!(
            set.as_slice(),
            &[Interval::new(5_000, 5_010), Interval::new(9_000, 9_000)]
        );
        // One probe per value plus at most two boundary re-probes per run.
        assert!(probes <= 10_000 + 2 * 2, "took {probes} probes");
    }

    #[test]
    fn test_oracle_failure_aborts() {
        let err = extract_recursive(AttributeDomain::new(1, 100), |v| {
            if v == 50 {
                Err(OracleError::new("backend unavailable"))
            } else {
                Ok(false)
            }
        })
        .unwrap_err();

        assert!(matches!(err, ExtractError::Oracle(e) if e.message == "backend unavailable"));
    }
}
