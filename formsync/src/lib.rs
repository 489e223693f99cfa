//! # formsync
//!
//! A form-state synchronization engine.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `formsync` to get everything, or on the individual
//! crates for finer-grained control.
//!
//! ```
//! use formsync::forms::{FieldConfig, FieldUnit, FormAggregate, RawEvent};
//!
//! let form = FormAggregate::new("login").into_shared();
//! let email = FieldUnit::mount(FieldConfig::new("email").input("email"), form.clone()).unwrap();
//! email.handle_change(RawEvent::input("a@b.com")).unwrap();
//! assert_eq!(form.values()["email"], "a@b.com");
//! ```

/// Errors, settings, settings loading and logging.
pub use formsync_core as core;

/// Synchronous signal dispatch for observers.
#[cfg(feature = "signals")]
pub use formsync_signals as signals;

/// Field units, the form aggregate, normalization and validation.
#[cfg(feature = "forms")]
pub use formsync_forms as forms;

pub use formsync_core::{FormError, FormResult, Settings};

/// Third-party crates used in the public API.
pub use serde_json;
pub use tracing;

/// The types most hosts need.
#[cfg(feature = "forms")]
pub mod prelude {
    pub use formsync_core::{FormError, FormResult, Settings};
    pub use formsync_forms::validators::{
        EmailValidator, FieldValidators, MaxLength, MinLength, RegexValidator, Required,
    };
    pub use formsync_forms::{
        FieldConfig, FieldState, FieldStatePatch, FieldTrigger, FieldUnit, FormAggregate,
        FormCapabilities, FormEvent, FormState, FormValues, RawEvent, ValidationErrors,
    };
}
