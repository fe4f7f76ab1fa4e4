// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML topic list loading.
//!
//! The file is a mapping with a top-level `topics` sequence:
//!
//! ```yaml
//! topics:
//!   - /imu
//!   - /camera/front
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default topic list file name, relative to the working directory.
pub const DEFAULT_TOPIC_FILE: &str = "topic_list.yaml";

/// Topics selected for recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicConfig {
    topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TopicFile {
    #[serde(default)]
    topics: Option<Vec<String>>,
}

/// Topic list loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("YAML document is not a mapping")]
    NotAMapping,

    #[error("No topics found in YAML under 'topics'")]
    NoTopics,
}

impl TopicConfig {
    /// Parse a topic list from a YAML string.
    ///
    /// An empty document, a missing `topics` key, `topics: null` and an
    /// empty sequence are all rejected with [`ConfigError::NoTopics`].
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        if value.is_null() {
            return Err(ConfigError::NoTopics);
        }
        if !value.is_mapping() {
            return Err(ConfigError::NotAMapping);
        }

        let file: TopicFile = serde_yaml::from_value(value)?;
        match file.topics {
            Some(topics) if !topics.is_empty() => Ok(Self { topics }),
            _ => Err(ConfigError::NoTopics),
        }
    }

    /// Parse a topic list from a YAML file.
    ///
    /// The path is checked for existence before anything is read.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Topics in file order.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Consume the config, returning the topic list.
    pub fn into_topics(self) -> Vec<String> {
        self.topics
    }
}

/// Load the ordered topic list from `path`.
pub fn load_topics(path: &Path) -> Result<Vec<String>, ConfigError> {
    TopicConfig::from_file(path).map(TopicConfig::into_topics)
}
