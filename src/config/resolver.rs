//! Effective-dated configuration resolution.
//!
//! This module provides the [`ConfigResolver`] type for loading country
//! rule sets from YAML files and resolving the single version effective on
//! a calculation date.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::CountryConfiguration;

/// Loads and resolves effective-dated country configurations.
///
/// # Directory Structure
///
/// The configuration directory holds one subdirectory per country, each
/// containing one YAML file per configuration version:
/// ```text
/// config/
/// ├── civ/
/// │   ├── 2025-01-01.yaml
/// │   └── 2026-01-01.yaml
/// └── sen/
///     └── 2025-01-01.yaml
/// ```
///
/// The file name is informational; the effective range comes from the
/// `effective_from`/`effective_to` fields inside each file.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigResolver;
/// use chrono::NaiveDate;
///
/// let resolver = ConfigResolver::load("./config").unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let config = resolver.resolve("civ", date).unwrap();
/// println!("{} schemes", config.contribution_schemes.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    configurations: Vec<CountryConfiguration>,
}

impl ConfigResolver {
    /// Loads all country configurations from the specified directory.
    ///
    /// Every file is deserialized and validated; an invalid or unparseable
    /// configuration fails the whole load rather than being skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        if !path.exists() {
            return Err(EngineError::ConfigNotFound { path: path_str });
        }

        let entries = fs::read_dir(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let mut configurations = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: path_str.clone(),
            })?;
            let country_dir = entry.path();
            if country_dir.is_dir() {
                Self::load_country_dir(&country_dir, &mut configurations)?;
            }
        }

        if configurations.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no configuration files found)", path_str),
            });
        }

        Self::from_configurations(configurations)
    }

    /// Builds a resolver from already-constructed configurations.
    ///
    /// Each configuration is validated; this is the entry point for callers
    /// that hold their rule sets somewhere other than the filesystem.
    pub fn from_configurations(
        configurations: Vec<CountryConfiguration>,
    ) -> EngineResult<Self> {
        for config in &configurations {
            config.validate()?;
        }
        Ok(Self { configurations })
    }

    fn load_country_dir(
        dir: &Path,
        configurations: &mut Vec<CountryConfiguration>,
    ) -> EngineResult<()> {
        let dir_str = dir.display().to_string();
        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                configurations.push(Self::load_yaml(&path)?);
            }
        }
        Ok(())
    }

    fn load_yaml(path: &Path) -> EngineResult<CountryConfiguration> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns all loaded configurations.
    pub fn configurations(&self) -> &[CountryConfiguration] {
        &self.configurations
    }

    /// Resolves the single configuration for a country effective on a date.
    ///
    /// # Errors
    ///
    /// - `ConfigurationNotFound` when no version covers the date; the
    ///   resolver never falls back to a default or most-recent version.
    /// - `ConfigurationAmbiguous` when more than one version covers the date
    ///   (an overlap bug in the stored data) rather than guessing.
    pub fn resolve(
        &self,
        country: &str,
        date: NaiveDate,
    ) -> EngineResult<&CountryConfiguration> {
        let mut matches = self
            .configurations
            .iter()
            .filter(|c| c.country_code == country && c.applies_on(date));

        let first = matches.next().ok_or_else(|| EngineError::ConfigurationNotFound {
            country: country.to_string(),
            date,
        })?;

        let extra = matches.count();
        if extra > 0 {
            return Err(EngineError::ConfigurationAmbiguous {
                country: country.to_string(),
                date,
                matching: extra + 1,
            });
        }

        Ok(first)
    }
}
