use serde::{Deserialize, Serialize};

/// Inclusive integer range `[min, max]` one attribute may take.
///
/// `min > max` is a legal empty domain: every extractor returns an empty
/// interval set for it without probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeDomain {
    pub min: i64,
    pub max: i64,
}

impl AttributeDomain {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Number of values in the domain, saturating at `u64::MAX`.
    pub fn size(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let span = (self.max as i128) - (self.min as i128) + 1;
        u64::try_from(span).unwrap_or(u64::MAX)
    }

    /// First value above the domain, or `None` when `max == i64::MAX`.
    pub fn sentinel(&self) -> Option<i64> {
        self.max.checked_add(1)
    }
}

impl From<(i64, i64)> for AttributeDomain {
    fn from((min, max): (i64, i64)) -> Self {
        Self::new(min, max)
    }
}

impl std::fmt::Display for AttributeDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
