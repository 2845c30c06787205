//! Extraction configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_INCLUDE_PATTERN;

/// Configuration for a single extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Root directory to scan.
    pub root: PathBuf,

    /// Include glob pattern, matched against root-relative paths.
    pub include: String,

    /// Exclusion glob patterns, evaluated in order; matching any one
    /// drops the file.
    pub exclude: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            include: DEFAULT_INCLUDE_PATTERN.to_string(),
            exclude: default_exclude_patterns(),
        }
    }
}

fn default_exclude_patterns() -> Vec<String> {
    [
        "**/__pycache__/**",
        "**/.venv/**",
        "**/venv/**",
        "**/.git/**",
        "**/.tox/**",
        "**/build/**",
        "**/dist/**",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl ExtractConfig {
    /// Create a configuration for the given root with default patterns.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Load pattern overrides from environment variables.
    ///
    /// `DOCSCOUT_INCLUDE` replaces the include pattern; `DOCSCOUT_EXCLUDE`
    /// is a comma-separated list replacing the exclusion patterns.
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        let base = Self::default();
        Self {
            root: root.into(),
            include: std::env::var("DOCSCOUT_INCLUDE").unwrap_or(base.include),
            exclude: std::env::var("DOCSCOUT_EXCLUDE")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(base.exclude),
        }
    }
}
