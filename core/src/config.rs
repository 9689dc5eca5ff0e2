//! Evaluation configuration
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::{Capacity, SearchOrder};

/// Capacity given to game-to-team edges, which must never constrain the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnboundedCapacity {
    /// One more than the total source capacity of the instance
    #[default]
    Derived,
    /// A fixed sentinel value
    Fixed(Capacity),
}

impl UnboundedCapacity {
    /// Resolve the policy against the total capacity leaving the source
    ///
    /// A fixed value smaller than the derived one would cut off flow, so it
    /// is raised to the derived value.
    pub fn resolve(self, source_capacity: Capacity) -> Capacity {
        let derived = source_capacity.saturating_add(1);
        match self {
            UnboundedCapacity::Derived => derived,
            UnboundedCapacity::Fixed(capacity) => capacity.max(derived),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Knobs for one elimination evaluation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Capacity policy for game-to-team edges
    pub game_capacity: UnboundedCapacity,

    /// Neighbour scan order of the augmenting-path search
    pub search_order: SearchOrder,
}

impl EvaluationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvaluationConfig::default();
        assert_eq!(config.game_capacity, UnboundedCapacity::Derived);
        assert_eq!(config.search_order, SearchOrder::Ascending);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EvaluationConfig::from_json_str(r#"{"search_order":"descending"}"#).unwrap();
        assert_eq!(config.search_order, SearchOrder::Descending);
        assert_eq!(config.game_capacity, UnboundedCapacity::Derived);

        let config = EvaluationConfig::from_json_str(r#"{"game_capacity":{"fixed":10000}}"#).unwrap();
        assert_eq!(config.game_capacity, UnboundedCapacity::Fixed(10000));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            EvaluationConfig::from_json_str(r#"{"search_order":"random"}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EvaluationConfig::from_json_file("/nonexistent/pennant.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_resolve_capacity() {
        assert_eq!(UnboundedCapacity::Derived.resolve(12), 13);
        assert_eq!(UnboundedCapacity::Derived.resolve(Capacity::MAX), Capacity::MAX);
        assert_eq!(UnboundedCapacity::Fixed(10000).resolve(12), 10000);
        assert_eq!(UnboundedCapacity::Fixed(5).resolve(12), 13);
        assert_eq!(UnboundedCapacity::Fixed(0).resolve(0), 1);
    }
}
