//! # formsync-forms
//!
//! Form-state synchronization. A [`FormAggregate`] owns the canonical state
//! of a dynamic set of named fields; each [`FieldUnit`] registers itself,
//! turns raw input events into semantic values, and submits partial updates.
//! Every update re-runs validation synchronously and notifies observers.
//!
//! ## Modules
//!
//! - [`event`] - Raw input events and update triggers
//! - [`normalize`] - Pure value normalization (checkbox semantics, format, trim)
//! - [`field_state`] - Per-field state and partial updates
//! - [`form_state`] - Aggregate state snapshot
//! - [`validation`] - The validation pipeline
//! - [`validators`] - Stock per-value validators
//! - [`aggregate`] - The single-writer form aggregate and its capability trait
//! - [`field`] - Field units and their configuration
//! - [`render`] - Rendering variants and built-in widgets

pub mod aggregate;
pub mod event;
pub mod field;
pub mod field_state;
pub mod form_state;
pub mod normalize;
pub mod render;
pub mod validation;
pub mod validators;

pub use aggregate::{FieldUpdate, FormAggregate, FormCapabilities, FormEvent};
pub use event::{EventTarget, FieldTrigger, InputType, RawEvent};
pub use field::{Component, FieldConfig, FieldEvents, FieldUnit};
pub use field_state::{FieldProps, FieldState, FieldStatePatch, InitialFieldState};
pub use form_state::{FormState, FormValues};
pub use normalize::{Formatter, InitialValue};
pub use render::{CustomProps, CustomRenderer, Markup, Renderer};
pub use validation::{Validate, ValidationErrors};
pub use validators::{FieldValidators, Validator};
