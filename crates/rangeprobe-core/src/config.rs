//! Run configuration: what to probe, over which domains, with which extractor.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use rangeprobe_extract::neutral::{sentinels, NeutralValues};
use rangeprobe_extract::{Assignment, AttributeDomain, ExtractError, ExtractorKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config lists no attributes")]
    NoAttributes,

    #[error("attribute '{0}' is listed more than once")]
    DuplicateAttribute(String),

    #[error("attribute '{0}' has no domain")]
    MissingDomain(String),
}

/// How non-target attributes are pinned during each pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum NeutralStrategy {
    /// Caller-chosen values known to make each attribute's clause false.
    Values { values: NeutralValues },
    /// `max + 1` for every attribute. Only sound for domain-bounded oracles.
    #[default]
    Sentinel,
}

/// A complete extraction run, as loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Attributes to extract, in pass order.
    pub attributes: Vec<String>,
    pub domains: BTreeMap<String, AttributeDomain>,
    /// Starting values, including attributes the oracle reads but that are
    /// never extracted.
    #[serde(default)]
    pub initial: Assignment,
    #[serde(default)]
    pub neutral: NeutralStrategy,
    /// Predicate text handed to the compiler to build the oracle.
    pub predicate: String,
    #[serde(default)]
    pub extractor: ExtractorKind,
}

impl RunConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Structural checks that need no oracle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attributes.is_empty() {
            return Err(ConfigError::NoAttributes);
        }
        let mut seen = HashSet::new();
        for attribute in &self.attributes {
            if !seen.insert(attribute.as_str()) {
                return Err(ConfigError::DuplicateAttribute(attribute.clone()));
            }
            if !self.domains.contains_key(attribute) {
                return Err(ConfigError::MissingDomain(attribute.clone()));
            }
        }
        Ok(())
    }

    /// Turn the neutral strategy into the explicit map the orchestrator takes.
    pub fn neutral_values(&self) -> Result<NeutralValues, ExtractError> {
        match &self.neutral {
            NeutralStrategy::Values { values } => Ok(values.clone()),
            NeutralStrategy::Sentinel => sentinels(&self.attributes, &self.domains),
        }
    }
}
