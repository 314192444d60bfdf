//! Configuration loading from protocheck.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::descriptor::PackageSource;
use crate::error::{CheckerError, CheckerResult, IoResultExt};

/// Default config file name looked up by [`find_config`].
pub const CONFIG_FILE: &str = "protocheck.toml";

/// Main configuration structure for protocheck.toml.
#[derive(Debug, Deserialize, Default)]
pub struct CheckerConfig {
    /// Package prefixes to ignore.
    pub ignore_packages: Option<Vec<String>>,
    /// Fully-qualified type names to ignore.
    pub ignore_messages: Option<Vec<String>>,
    /// Package source: "java" or "proto" (go_package when unset).
    pub language_package: Option<String>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl CheckerConfig {
    /// The configured package source, if any.
    pub fn package_source(&self) -> CheckerResult<Option<PackageSource>> {
        self.language_package
            .as_deref()
            .map(PackageSource::from_param)
            .transpose()
    }

    /// Whether JSON output was requested.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from an explicit file path.
pub fn load_config(path: &Path) -> CheckerResult<CheckerConfig> {
    let content = fs::read_to_string(path).with_path(path)?;
    toml::from_str(&content).map_err(|e| CheckerError::config(path, e.to_string()))
}

/// Loads protocheck.toml from `dir` if it exists.
pub fn find_config(dir: &Path) -> CheckerResult<Option<CheckerConfig>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config(&path).map(Some)
}
