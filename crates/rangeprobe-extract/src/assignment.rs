use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A concrete assignment of integer values to attributes.
/// Uses BTreeMap for deterministic ordering, like every map the oracle sees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    values: BTreeMap<String, i64>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: &str) -> Option<i64> {
        self.values.get(attribute).copied()
    }

    /// Set `attribute` to `value`, returning the previous value if any.
    pub fn set(&mut self, attribute: &str, value: i64) -> Option<i64> {
        self.values.insert(attribute.to_string(), value)
    }

    /// Owned copy of this assignment with one slot overwritten.
    ///
    /// The parallel extractor hands one of these to every probe, so no two
    /// concurrent oracle calls share a mutable vector.
    pub fn with_value(&self, attribute: &str, value: i64) -> Self {
        let mut snapshot = self.clone();
        snapshot.set(attribute, value);
        snapshot
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.values.contains_key(attribute)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<BTreeMap<String, i64>> for Assignment {
    fn from(values: BTreeMap<String, i64>) -> Self {
        Self { values }
    }
}
