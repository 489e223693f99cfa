//! Settings for the formsync engine.
//!
//! [`Settings`] is a plain serde struct with sensible defaults. There is no
//! global instance: hosts load or build a `Settings` value and hand it to the
//! form aggregate and to [`setup_logging`](crate::logging::setup_logging)
//! explicitly.

use serde::{Deserialize, Serialize};

/// The complete set of engine settings.
///
/// # Examples
///
/// ```
/// use formsync_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// assert!(!settings.validate_on_register);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    // ── Logging ──────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// Log filter directive, e.g. `"info"` or `"formsync_forms=debug"`.
    pub log_level: String,

    // ── Field defaults ───────────────────────────────────────────────

    /// Trim applied to fields that do not configure `trim` themselves.
    pub trim_by_default: bool,

    // ── Validation ───────────────────────────────────────────────────

    /// Run the validator when a field registers, not only on updates.
    pub validate_on_register: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            trim_by_default: false,
            validate_on_register: false,
        }
    }
}
