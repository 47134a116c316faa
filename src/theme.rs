//! Metric themes loaded from TOML
//!
//! A theme overrides any subset of [`LayoutMetrics`]; fields it leaves out
//! keep their reference values.
//!
//! ```toml
//! [metadata]
//! name = "roomy"
//!
//! [metrics]
//! margin = 40
//! message_height = 36
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::LayoutMetrics;

/// Errors that can occur when loading or parsing themes
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse theme TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Named set of layout metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    pub name: Option<String>,
    pub description: Option<String>,
    pub metrics: LayoutMetrics,
}

/// TOML structure for deserializing themes
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTheme {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    metrics: LayoutMetrics,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl Theme {
    /// Load theme from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load theme from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlTheme = toml::from_str(content)?;

        Ok(Theme {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            metrics: parsed.metrics,
        })
    }
}
