//! TOML-based configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::projection::params::ParameterSet;
use crate::sync::address::DEFAULT_BASE_URL;

/// Top-level configuration parsed from TOML.
///
/// All sections are optional and default to the baseline preset. Load from
/// TOML with [`AppConfig::from_toml_file`] or use [`AppConfig::baseline`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Admin credential and share-link base.
    #[serde(default)]
    pub access: AccessConfig,
    /// Parameter defaults applied before the address query is merged.
    #[serde(default)]
    pub defaults: ParameterSet,
}

/// Access control and addressing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessConfig {
    /// Secret the `admin` query value must equal to unlock editing.
    pub admin_key: Option<String>,
    /// Location a bare query string is resolved against.
    pub base_url: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admin_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown preset \"{name}\", available: {available}")]
    UnknownPreset { name: String, available: String },
    /// A field violates a constraint; `field` is a dotted path.
    #[error("config error: {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Dotted field path for [`ConfigError::Invalid`], `None` otherwise.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl AppConfig {
    /// Returns the baseline configuration (the calculator's stock defaults).
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the battery-backup preset: battery subscription included.
    pub fn battery_backup() -> Self {
        Self {
            defaults: ParameterSet {
                include_battery: true,
                ..ParameterSet::default()
            },
            ..Self::default()
        }
    }

    /// Returns the flat-rates preset: no utility or PPA escalation.
    pub fn flat_rates() -> Self {
        Self {
            defaults: ParameterSet {
                utility_esc: 0.0,
                ppa_esc: 0.0,
                ..ParameterSet::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "battery_backup", "flat_rates"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] if the name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        let cfg = match name {
            "baseline" => Self::baseline(),
            "battery_backup" => Self::battery_backup(),
            "flat_rates" => Self::flat_rates(),
            _ => {
                return Err(ConfigError::UnknownPreset {
                    name: name.to_string(),
                    available: Self::PRESETS.join(", "),
                });
            }
        };
        info!(preset = name, "loaded preset");
        Ok(cfg)
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded config file");
        Ok(cfg)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Resolves the admin secret: `cli` (flag or environment) wins over the
    /// file, and an unset secret is the empty string.
    pub fn admin_secret<'a>(&'a self, cli: Option<&'a str>) -> &'a str {
        cli.or(self.access.admin_key.as_deref()).unwrap_or("")
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let d = &self.defaults;

        if !(d.usage.is_finite() && d.usage > 0.0) {
            errors.push(ConfigError::invalid("defaults.usage", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&d.itc) {
            errors.push(ConfigError::invalid("defaults.itc", "must be in [0.0, 1.0]"));
        }

        let non_negative = [
            ("defaults.utility_rate", d.utility_rate),
            ("defaults.ppa_rate", d.ppa_rate),
            ("defaults.net_metering_credit", d.net_metering_credit),
            ("defaults.system_cost", d.system_cost),
            ("defaults.maintenance", d.maintenance),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::invalid(field, "must be finite and >= 0"));
            }
        }

        for (field, value) in [
            ("defaults.utility_esc", d.utility_esc),
            ("defaults.ppa_esc", d.ppa_esc),
        ] {
            if !(value.is_finite() && value > -1.0) {
                errors.push(ConfigError::invalid(field, "must be finite and > -1.0"));
            }
        }

        if let Err(e) = Url::parse(&self.access.base_url) {
            errors.push(ConfigError::invalid(
                "access.base_url",
                format!("must be an absolute URL ({e})"),
            ));
        }

        errors
    }
}
