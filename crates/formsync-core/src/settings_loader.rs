//! Settings loading from configuration files.
//!
//! This module loads [`Settings`] from TOML and JSON files and applies
//! environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FORMSYNC_DEBUG` | `debug` |
//! | `FORMSYNC_LOG_LEVEL` | `log_level` |
//! | `FORMSYNC_TRIM_BY_DEFAULT` | `trim_by_default` |
//! | `FORMSYNC_VALIDATE_ON_REGISTER` | `validate_on_register` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use formsync_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/formsync.toml").unwrap();
//! let settings = settings_loader::from_json_file_with_env("config/formsync.json").unwrap();
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::FormError;
use crate::settings::Settings;

/// A settings document where every key is optional.
///
/// Both file formats deserialize into this shape, and environment overrides
/// are collected into it too, so every source is layered the same way.
#[derive(Debug, Default, Deserialize)]
struct PartialSettings {
    debug: Option<bool>,
    log_level: Option<String>,
    trim_by_default: Option<bool>,
    validate_on_register: Option<bool>,
}

impl PartialSettings {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| lookup(key).map(|raw| parse_bool(&raw));
        Self {
            debug: flag("FORMSYNC_DEBUG"),
            log_level: lookup("FORMSYNC_LOG_LEVEL"),
            trim_by_default: flag("FORMSYNC_TRIM_BY_DEFAULT"),
            validate_on_register: flag("FORMSYNC_VALIDATE_ON_REGISTER"),
        }
    }

    fn layer_onto(self, settings: &mut Settings) {
        if let Some(debug) = self.debug {
            settings.debug = debug;
        }
        if let Some(log_level) = self.log_level {
            settings.log_level = log_level;
        }
        if let Some(trim) = self.trim_by_default {
            settings.trim_by_default = trim;
        }
        if let Some(validate) = self.validate_on_register {
            settings.validate_on_register = validate;
        }
    }

    fn into_settings(self) -> Settings {
        let mut settings = Settings::default();
        self.layer_onto(&mut settings);
        settings
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Toml,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        })
    }
}

fn invalid(format: Format, err: impl fmt::Display) -> FormError {
    FormError::ConfigurationError(format!("invalid {format} settings: {err}"))
}

fn read_settings_file(path: &Path, format: Format) -> Result<String, FormError> {
    std::fs::read_to_string(path).map_err(|e| {
        FormError::ConfigurationError(format!(
            "cannot read {format} settings from {}: {e}",
            path.display()
        ))
    })
}

/// Loads settings from a TOML string.
///
/// Keys missing from the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or a key has the wrong type.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormError> {
    toml::from_str::<PartialSettings>(toml_str)
        .map(PartialSettings::into_settings)
        .map_err(|e| invalid(Format::Toml, e))
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    from_toml_str(&read_settings_file(path.as_ref(), Format::Toml)?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or a key has the wrong type.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormError> {
    serde_json::from_str::<PartialSettings>(json_str)
        .map(PartialSettings::into_settings)
        .map_err(|e| invalid(Format::Json, e))
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    from_json_str(&read_settings_file(path.as_ref(), Format::Json)?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `FORMSYNC_*` environment variable overrides to a settings struct.
///
/// Boolean variables accept `"true"`, `"1"` and `"yes"` (case-insensitive) as
/// true; anything else is false.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |key| std::env::var(key).ok());
}

/// Applies overrides read through `lookup` instead of the process environment.
pub fn apply_overrides_from(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    PartialSettings::from_lookup(lookup).layer_onto(settings);
}

fn parse_bool(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
