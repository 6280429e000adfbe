use serde::{Deserialize, Serialize};

/// Inclusive integer run `[start, end]` over which the oracle held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(start: i64, end: i64) -> Self {
        debug_assert!(start <= end, "interval start {start} exceeds end {end}");
        Self { start, end }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.start..=self.end).contains(&value)
    }

    /// Number of values covered, saturating at `u64::MAX`.
    pub fn width(&self) -> u64 {
        let span = (self.end as i128) - (self.start as i128) + 1;
        u64::try_from(span).unwrap_or(u64::MAX)
    }
}

impl From<(i64, i64)> for Interval {
    fn from((start, end): (i64, i64)) -> Self {
        Self::new(start, end)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// The true-runs found for one attribute, ordered by `start` and pairwise
/// disjoint.
///
/// Adjacent runs are never merged: `(1, 9)` and `(10, 19)` only both appear
/// if the extractor saw them as separate runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from runs in any order. Overlapping input is a bug in the
    /// caller and trips a debug assertion.
    pub fn from_unsorted(mut intervals: Vec<Interval>) -> Self {
        intervals.sort_unstable();
        debug_assert!(
            intervals.windows(2).all(|w| w[0].end < w[1].start),
            "overlapping intervals: {intervals:?}"
        );
        Self { intervals }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn into_vec(self) -> Vec<Interval> {
        self.intervals
    }

    /// Whether `value` falls inside any run.
    pub fn contains(&self, value: i64) -> bool {
        let idx = self.intervals.partition_point(|iv| iv.end < value);
        self.intervals
            .get(idx)
            .is_some_and(|iv| iv.contains(value))
    }

    /// Total number of values covered by all runs.
    pub fn covered(&self) -> u64 {
        self.intervals
            .iter()
            .fold(0u64, |acc, iv| acc.saturating_add(iv.width()))
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl FromIterator<(i64, i64)> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = (i64, i64)>>(iter: I) -> Self {
        Self::from_unsorted(iter.into_iter().map(Interval::from).collect())
    }
}

impl std::fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, iv) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{iv}")?;
        }
        f.write_str("]")
    }
}

/// Run-length state machine over an ascending stream of probe outcomes.
///
/// Shared by the linear and parallel extractors so both turn the same
/// boolean sequence into the same runs.
#[derive(Debug, Default)]
pub(crate) struct RunBuilder {
    open: Option<i64>,
    last: Option<i64>,
    intervals: Vec<Interval>,
}

impl RunBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed the outcome for `value`. Values must arrive strictly ascending
    /// and contiguous.
    pub(crate) fn push(&mut self, value: i64, holds: bool) {
        debug_assert!(
            self.last
                .is_none_or(|last| last.checked_add(1) == Some(value)),
            "non-contiguous value {value} after {:?}",
            self.last
        );
        match (holds, self.open) {
            (true, None) => self.open = Some(value),
            (false, Some(start)) => {
                // value > start here, so value - 1 cannot underflow.
                self.intervals.push(Interval::new(start, value - 1));
                self.open = None;
            }
            _ => {}
        }
        self.last = Some(value);
    }

    /// Close any run still open at the top of the domain.
    pub(crate) fn finish(mut self) -> IntervalSet {
        if let (Some(start), Some(last)) = (self.open, self.last) {
            self.intervals.push(Interval::new(start, last));
        }
        IntervalSet {
            intervals: self.intervals,
        }
    }
}
