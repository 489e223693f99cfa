//! Stock per-value validators.
//!
//! Each [`Validator`] checks a single constraint on one field's read value.
//! [`FieldValidators`] attaches lists of validators to field names and is
//! itself a whole-form [`Validate`] implementation, so it can be handed to a
//! form aggregate directly.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use formsync_core::{FormError, FormResult};

use crate::form_state::FormValues;
use crate::validation::{Validate, ValidationErrors};

/// The email pattern used by [`EmailValidator`].
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_.]+@[A-Za-z0-9_]+\.[A-Za-z0-9_]{2,9}$";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// A trait for validating a single field value.
///
/// # Examples
///
/// ```
/// use formsync_forms::validators::{Validator, MaxLength};
///
/// let v = MaxLength::new(5);
/// assert!(v.validate("hi").is_ok());
/// assert!(v.validate("toolong").is_err());
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Validates the given value, returning the message to show if invalid.
    fn validate(&self, value: &str) -> Result<(), String>;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str;
}

/// Rejects empty values.
#[derive(Debug, Clone)]
pub struct Required {
    /// The message reported for an empty value.
    pub message: String,
}

impl Required {
    /// Creates a `Required` validator with the default message.
    pub fn new() -> Self {
        Self::with_message("This field is required.")
    }

    /// Creates a `Required` validator with a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for Required {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Err(self.message.clone());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "Required"
    }
}

/// Validates that a value does not exceed a maximum length in characters.
#[derive(Debug, Clone)]
pub struct MaxLength {
    /// The maximum allowed length.
    pub max_length: usize,
}

impl MaxLength {
    /// Creates a new `MaxLength` validator.
    pub const fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Validator for MaxLength {
    fn validate(&self, value: &str) -> Result<(), String> {
        let len = value.chars().count();
        if len > self.max_length {
            return Err(format!(
                "Ensure this value has at most {} characters (it has {len}).",
                self.max_length
            ));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "MaxLength"
    }
}

/// Validates that a non-empty value meets a minimum length in characters.
///
/// Empty values pass; combine with [`Required`] to reject them.
#[derive(Debug, Clone)]
pub struct MinLength {
    /// The minimum required length.
    pub min_length: usize,
}

impl MinLength {
    /// Creates a new `MinLength` validator.
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Validator for MinLength {
    fn validate(&self, value: &str) -> Result<(), String> {
        let len = value.chars().count();
        if len > 0 && len < self.min_length {
            return Err(format!(
                "Ensure this value has at least {} characters (it has {len}).",
                self.min_length
            ));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "MinLength"
    }
}

/// Validates a value against a regular expression.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
    message: String,
}

impl RegexValidator {
    /// Compiles `pattern` into a validator reporting `message` on mismatch.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pattern does not compile.
    pub fn new(pattern: &str, message: impl Into<String>) -> FormResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            FormError::ConfigurationError(format!("Invalid validation pattern '{pattern}': {e}"))
        })?;
        Ok(Self::from_regex(regex, message))
    }

    /// Wraps an already compiled regex.
    pub fn from_regex(regex: Regex, message: impl Into<String>) -> Self {
        Self {
            regex,
            message: message.into(),
        }
    }

    /// Returns the pattern source.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if self.regex.is_match(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn name(&self) -> &str {
        "RegexValidator"
    }
}

/// Validates an email address against [`EMAIL_PATTERN`].
#[derive(Debug, Clone)]
pub struct EmailValidator {
    /// The message reported for an invalid address.
    pub message: String,
}

impl EmailValidator {
    /// Creates an `EmailValidator` reporting `"Invalid Email"`.
    pub fn new() -> Self {
        Self {
            message: "Invalid Email".to_string(),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if EMAIL_RE.is_match(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn name(&self) -> &str {
        "EmailValidator"
    }
}

/// Per-field validator lists, usable as a whole-form [`Validate`].
///
/// For each field with rules, the first failing validator's message is
/// reported. Rules for fields that are not registered are skipped.
///
/// # Examples
///
/// ```
/// use formsync_forms::validators::{EmailValidator, FieldValidators, Required};
/// use formsync_forms::validation::Validate;
/// use formsync_forms::form_state::FormValues;
///
/// let rules = FieldValidators::new()
///     .rule("email", Required::new())
///     .rule("email", EmailValidator::new());
///
/// let mut values = FormValues::new();
/// values.insert("email".to_string(), "nope".to_string());
/// assert_eq!(rules.validate(&values)["email"], "Invalid Email");
/// ```
#[derive(Debug, Default)]
pub struct FieldValidators {
    rules: IndexMap<String, Vec<Box<dyn Validator>>>,
}

impl FieldValidators {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validator for `field`.
    #[must_use]
    pub fn rule(mut self, field: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.rules
            .entry(field.into())
            .or_default()
            .push(Box::new(validator));
        self
    }

    /// Returns the names of the validators attached to `field`.
    pub fn validator_names(&self, field: &str) -> Vec<&str> {
        self.rules
            .get(field)
            .map(|list| list.iter().map(|v| v.name()).collect())
            .unwrap_or_default()
    }
}

impl Validate for FieldValidators {
    fn validate(&self, values: &FormValues) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for (field, validators) in &self.rules {
            let Some(value) = values.get(field) else {
                continue;
            };
            if let Some(message) = validators.iter().find_map(|v| v.validate(value).err()) {
                errors.insert(field.clone(), message);
            }
        }
        errors
    }
}
