//! Oracle-probing interval extraction.
//!
//! Recovers, per attribute, the maximal integer runs over which a black-box
//! boolean oracle holds while every other attribute is pinned to a neutral
//! value. Three single-attribute extractors share one output contract:
//! - [`recursive`]: midpoint-first divide and conquer, probe-efficient when
//!   true-runs are sparse.
//! - [`linear`]: exhaustive sequential scan, the ground truth.
//! - [`parallel`]: exhaustive scan over a bounded rayon pool.
//!
//! [`orchestrator::extract_all`] drives one of them across a list of
//! attributes.

pub mod assignment;
pub mod domain;
pub mod error;
pub mod interval;
pub mod linear;
pub mod neutral;
pub mod oracle;
pub mod orchestrator;
pub mod parallel;
pub mod recursive;

pub use assignment::Assignment;
pub use domain::AttributeDomain;
pub use error::ExtractError;
pub use interval::{Interval, IntervalSet};
pub use oracle::{CountingOracle, FnOracle, Oracle, OracleError};
pub use orchestrator::{extract_all, ExtractorKind};
