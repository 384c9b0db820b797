//! Import configuration.
//!
//! [`ImportOptions`] is what the pipeline consumes. [`ImportConfig`] is its
//! optional on-disk YAML form; CLI flags are layered on top of it.
//!
//! ```yaml
//! overwrite: false
//! max_error_messages: 20
//! defaults:
//!   country: Italy
//!   language: Italian
//! aliases:
//!   title: ["Nome del podcast"]
//!   host: ["Voce"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::columns::HeaderAliases;

pub const DEFAULT_MAX_ERROR_MESSAGES: usize = 20;
pub const DEFAULT_COUNTRY: &str = "Unknown";
pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_STATUS: &str = "Active";

/// Values substituted when an optional column is absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    pub country: String,
    pub language: String,
    pub status: String,
    /// Defaults to the current calendar year when unset.
    pub year: Option<i32>,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            status: DEFAULT_STATUS.to_string(),
            year: None,
        }
    }
}

impl FieldDefaults {
    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(current_year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Update matching podcasts instead of skipping them.
    pub overwrite: bool,
    pub max_error_messages: usize,
    pub defaults: FieldDefaults,
    pub aliases: HeaderAliases,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            max_error_messages: DEFAULT_MAX_ERROR_MESSAGES,
            defaults: FieldDefaults::default(),
            aliases: HeaderAliases::default(),
        }
    }
}

impl ImportOptions {
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    pub overwrite: Option<bool>,
    pub max_error_messages: Option<usize>,
    pub defaults: FieldDefaults,
    pub aliases: HeaderAliases,
}

impl ImportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Opening config file {path:?}"))?;
        Self::from_yaml(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn into_options(self) -> ImportOptions {
        ImportOptions {
            overwrite: self.overwrite.unwrap_or(false),
            max_error_messages: self
                .max_error_messages
                .unwrap_or(DEFAULT_MAX_ERROR_MESSAGES),
            defaults: self.defaults,
            aliases: self.aliases,
        }
    }
}

pub fn current_year() -> i32 {
    Local::now().year()
}
