#![allow(dead_code)]

//! Platform registry — the closed set of ATS platforms this deployment can dispatch to.
//!
//! Loaded once at startup from a JSON document mapping platform name to `PlatformConfig`.
//! The request path only reads from it; `upsert`/`update`/`save` exist for operators
//! maintaining the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file '{}' not found", path.display())]
    Missing { path: PathBuf },

    #[error("Invalid JSON in configuration file '{}': {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Platform '{name}' is misconfigured: {reason}")]
    InvalidPlatform { name: String, reason: String },

    #[error("Platform '{name}' not found in configuration. Available: {known:?}")]
    UnknownPlatform { name: String, known: Vec<String> },

    #[error("I/O error on configuration file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Integration metadata for one ATS platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub integration_id: String,
    #[serde(default)]
    pub requires_candidate_object: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update applied by `PlatformRegistry::update`. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformUpdate {
    pub integration_id: Option<String>,
    pub requires_candidate_object: Option<bool>,
    pub notes: Option<String>,
}

/// Listing view of a configured platform.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformSummary {
    pub name: String,
    pub integration_id: String,
    pub requires_candidate_object: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// True while the integration id is still the `YOUR_<NAME>_INTEGRATION_ID` template value.
    pub placeholder: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformRegistry {
    platforms: BTreeMap<String, PlatformConfig>,
}

impl PlatformRegistry {
    /// Reads and validates the registry file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::Missing {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let registry = Self::from_json(&raw).map_err(|e| match e {
            RegistryParseError::Json(source) => ConfigError::Invalid {
                path: path.to_path_buf(),
                source,
            },
            RegistryParseError::Platform(e) => e,
        })?;

        info!(
            "Loaded configurations for {} ATS platforms from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    fn from_json(raw: &str) -> Result<Self, RegistryParseError> {
        let platforms: BTreeMap<String, PlatformConfig> =
            serde_json::from_str(raw).map_err(RegistryParseError::Json)?;

        for (name, config) in &platforms {
            validate_platform(name, config).map_err(RegistryParseError::Platform)?;
        }

        Ok(Self { platforms })
    }

    pub fn get(&self, name: &str) -> Option<&PlatformConfig> {
        self.platforms.get(name)
    }

    /// Platform names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.platforms.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn summaries(&self) -> Vec<PlatformSummary> {
        self.platforms
            .iter()
            .map(|(name, config)| PlatformSummary {
                name: name.clone(),
                integration_id: config.integration_id.clone(),
                requires_candidate_object: config.requires_candidate_object,
                notes: config.notes.clone(),
                placeholder: config.integration_id == placeholder_integration_id(name),
            })
            .collect()
    }

    /// Adds a platform or replaces an existing one.
    pub fn upsert(&mut self, name: &str, config: PlatformConfig) -> Result<(), ConfigError> {
        validate_platform(name, &config)?;
        if self.platforms.insert(name.to_string(), config).is_some() {
            info!("Replaced ATS platform '{name}'");
        } else {
            info!("Added ATS platform '{name}'");
        }
        Ok(())
    }

    pub fn update(&mut self, name: &str, update: PlatformUpdate) -> Result<(), ConfigError> {
        let known = self.names();
        let config = self
            .platforms
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownPlatform {
                name: name.to_string(),
                known,
            })?;

        let mut updated = config.clone();
        if let Some(id) = update.integration_id {
            updated.integration_id = id;
        }
        if let Some(required) = update.requires_candidate_object {
            updated.requires_candidate_object = required;
        }
        if let Some(notes) = update.notes {
            updated.notes = Some(notes).filter(|n| !n.is_empty());
        }
        validate_platform(name, &updated)?;

        *config = updated;
        info!("Updated ATS platform '{name}'");
        Ok(())
    }

    /// Writes the registry back as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let body = serde_json::to_string_pretty(&self.platforms).map_err(|source| {
            ConfigError::Invalid {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, body).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

enum RegistryParseError {
    Json(serde_json::Error),
    Platform(ConfigError),
}

fn validate_platform(name: &str, config: &PlatformConfig) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::InvalidPlatform {
            name: name.to_string(),
            reason: "platform name is empty".to_string(),
        });
    }
    if config.integration_id.trim().is_empty() {
        return Err(ConfigError::InvalidPlatform {
            name: name.to_string(),
            reason: "integration_id is empty".to_string(),
        });
    }
    Ok(())
}

fn placeholder_integration_id(name: &str) -> String {
    format!("YOUR_{}_INTEGRATION_ID", name.to_uppercase())
}
