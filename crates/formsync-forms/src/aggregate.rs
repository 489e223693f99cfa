//! The form aggregate: sole owner and writer of [`FormState`].
//!
//! Field units never touch state directly. They talk to the aggregate through
//! the [`FormCapabilities`] trait, which is injected into each unit at
//! mount. Every update follows the same synchronous sequence:
//!
//! 1. shallow-merge the patch into the field's state;
//! 2. run the validation pipeline over the whole form;
//! 3. bump the revision;
//! 4. notify observers;
//! 5. hand the settled field and form state back to the caller.
//!
//! The state lock is held for the first three steps only. Observers, hooks and completion
//! callbacks run without it and may call back into the aggregate.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use formsync_core::logging::field_span;
use formsync_core::{FormError, FormResult, Settings};
use formsync_signals::Signal;

use crate::event::FieldTrigger;
use crate::field_state::{FieldState, FieldStatePatch, InitialFieldState};
use crate::form_state::{FormState, FormValues};
use crate::validation::{run_validation, Validate};

/// The form-level change hook: `(field_name, trigger)`.
pub type FormHook = Arc<dyn Fn(&str, &FieldTrigger) + Send + Sync>;

/// A notification sent to observers after a committed mutation.
///
/// Observers receive names and revisions only and re-fetch state through
/// [`FormCapabilities::get_form_state`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// A field registered (or re-registered).
    FieldRegistered {
        /// The field name.
        name: String,
        /// The revision after the mutation.
        revision: u64,
    },
    /// A field unregistered.
    FieldUnregistered {
        /// The field name.
        name: String,
        /// The revision after the mutation.
        revision: u64,
    },
    /// A field's state was updated and validation re-ran.
    StateChanged {
        /// The field name.
        name: String,
        /// The revision after the mutation.
        revision: u64,
    },
    /// The whole form was validated on request.
    Validated {
        /// The revision after the mutation.
        revision: u64,
    },
}

impl FormEvent {
    /// Returns the field the event concerns, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::FieldRegistered { name, .. }
            | Self::FieldUnregistered { name, .. }
            | Self::StateChanged { name, .. } => Some(name),
            Self::Validated { .. } => None,
        }
    }

    /// Returns the revision after the mutation.
    pub const fn revision(&self) -> u64 {
        match self {
            Self::FieldRegistered { revision, .. }
            | Self::FieldUnregistered { revision, .. }
            | Self::StateChanged { revision, .. }
            | Self::Validated { revision } => *revision,
        }
    }
}

/// The settled result of an update.
#[derive(Debug, Clone)]
pub struct FieldUpdate {
    /// The updated field's state.
    pub field: FieldState,
    /// The whole form's state after the update.
    pub form: FormState,
}

/// The capability interface a field unit needs from its form.
pub trait FormCapabilities: Send + Sync {
    /// Registers `name`, or refreshes its configuration-derived state if it
    /// is already registered. Interaction flags survive re-registration.
    fn register_field(&self, name: &str, initial: InitialFieldState);

    /// Removes `name`. Returns `true` if it was registered.
    fn unregister_field(&self, name: &str) -> bool;

    /// Merges `patch` into `name`, re-validates, notifies observers and
    /// returns the settled state.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotRegistered`] if `name` is not registered.
    fn set_field_state(&self, name: &str, patch: FieldStatePatch) -> FormResult<FieldUpdate>;

    /// Like [`set_field_state`](Self::set_field_state), then calls
    /// `on_complete` exactly once with the settled state.
    fn set_field_state_then(
        &self,
        name: &str,
        patch: FieldStatePatch,
        on_complete: &mut dyn FnMut(&FieldState, &FormState),
    ) -> FormResult<()> {
        let update = self.set_field_state(name, patch)?;
        on_complete(&update.field, &update.form);
        Ok(())
    }

    /// Returns a snapshot of the current state.
    fn get_form_state(&self) -> FormState;

    /// Returns a snapshot of one field, or `None` if it is not registered.
    fn field_state(&self, name: &str) -> Option<FieldState> {
        self.get_form_state().fields.get(name).cloned()
    }

    /// The form-level change hook, called after every field update.
    fn on_change(&self, name: &str, trigger: &FieldTrigger);
}

/// The canonical form-state owner.
///
/// # Examples
///
/// ```
/// use formsync_forms::aggregate::{FormAggregate, FormCapabilities};
/// use formsync_forms::field_state::{FieldStatePatch, InitialFieldState};
///
/// let form = FormAggregate::new("profile");
/// form.register_field("name", InitialFieldState::default());
///
/// let update = form.set_field_state("name", FieldStatePatch::changed("Ada")).unwrap();
/// assert_eq!(update.field.value, "Ada");
/// assert!(update.field.dirty);
/// ```
pub struct FormAggregate {
    name: String,
    state: RwLock<FormState>,
    validator: Option<Arc<dyn Validate>>,
    on_change: Option<FormHook>,
    observers: Signal<FormEvent>,
    settings: Settings,
}

impl FormAggregate {
    /// Creates an empty aggregate with default settings and no validator.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(FormState::new()),
            validator: None,
            on_change: None,
            observers: Signal::new(),
            settings: Settings::default(),
        }
    }

    /// Sets the whole-form validator.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Validate + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Sets the form-level change hook.
    #[must_use]
    pub fn with_on_change(
        mut self,
        hook: impl Fn(&str, &FieldTrigger) + Send + Sync + 'static,
    ) -> Self {
        self.on_change = Some(Arc::new(hook));
        self
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Wraps the aggregate for sharing with field units.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Returns the form name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the settings in effect.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Connects an observer. An observer with the same `id` is replaced.
    pub fn subscribe(
        &self,
        id: impl Into<String>,
        observer: impl Fn(&FormEvent) + Send + Sync + 'static,
    ) {
        self.observers.connect(id, Arc::new(observer));
    }

    /// Disconnects an observer. Returns `true` if it was connected.
    pub fn unsubscribe(&self, id: &str) -> bool {
        self.observers.disconnect(id)
    }

    /// Returns the read values of every field.
    pub fn values(&self) -> FormValues {
        self.read().values()
    }

    /// Runs the validator over the whole form outside of any field update,
    /// e.g. before submission, and notifies observers.
    pub fn validate(&self) -> FormState {
        let snapshot = {
            let mut state = self.write();
            run_validation(self.validator.as_deref(), &mut state);
            state.revision += 1;
            FormState::clone(&state)
        };
        tracing::debug!(
            form = %self.name,
            revision = snapshot.revision,
            errors = snapshot.errors.len(),
            "form validated"
        );
        self.observers.send(&FormEvent::Validated {
            revision: snapshot.revision,
        });
        snapshot
    }

    fn read(&self) -> RwLockReadGuard<'_, FormState> {
        self.state.read().expect("form state lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, FormState> {
        self.state.write().expect("form state lock poisoned")
    }
}

impl fmt::Debug for FormAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormAggregate")
            .field("name", &self.name)
            .field("state", &*self.read())
            .field("has_validator", &self.validator.is_some())
            .field("has_on_change", &self.on_change.is_some())
            .field("observers", &self.observers)
            .field("settings", &self.settings)
            .finish()
    }
}

impl FormCapabilities for FormAggregate {
    fn register_field(&self, name: &str, initial: InitialFieldState) {
        let default_trim = self.settings.trim_by_default;
        let (revision, refreshed) = {
            let mut state = self.write();
            let refreshed = match state.fields.get_mut(name) {
                Some(existing) => {
                    existing.refresh(initial, default_trim);
                    true
                }
                None => {
                    let field = FieldState::from_initial(initial, default_trim);
                    state.fields.insert(name.to_string(), field);
                    false
                }
            };
            if self.settings.validate_on_register {
                run_validation(self.validator.as_deref(), &mut state);
            }
            state.revision += 1;
            (state.revision, refreshed)
        };

        tracing::debug!(form = %self.name, field = name, revision, refreshed, "field registered");
        self.observers.send(&FormEvent::FieldRegistered {
            name: name.to_string(),
            revision,
        });
    }

    fn unregister_field(&self, name: &str) -> bool {
        let revision = {
            let mut state = self.write();
            if state.fields.shift_remove(name).is_none() {
                return false;
            }
            state.errors.shift_remove(name);
            state.revision += 1;
            state.revision
        };

        tracing::debug!(form = %self.name, field = name, revision, "field unregistered");
        self.observers.send(&FormEvent::FieldUnregistered {
            name: name.to_string(),
            revision,
        });
        true
    }

    fn set_field_state(&self, name: &str, patch: FieldStatePatch) -> FormResult<FieldUpdate> {
        let _span = field_span(&self.name, name).entered();
        let update = {
            let mut state = self.write();
            match state.fields.get_mut(name) {
                Some(field) => patch.apply(field, self.settings.trim_by_default),
                None => {
                    tracing::warn!(
                        form = %self.name,
                        field = name,
                        "update for unregistered field"
                    );
                    return Err(FormError::NotRegistered(name.to_string()));
                }
            }
            run_validation(self.validator.as_deref(), &mut state);
            state.revision += 1;
            FieldUpdate {
                field: state.fields[name].clone(),
                form: FormState::clone(&state),
            }
        };

        tracing::debug!(
            form = %self.name,
            field = name,
            revision = update.form.revision,
            error = ?update.field.error,
            "field state updated"
        );
        self.observers.send(&FormEvent::StateChanged {
            name: name.to_string(),
            revision: update.form.revision,
        });
        Ok(update)
    }

    fn get_form_state(&self) -> FormState {
        self.read().clone()
    }

    fn field_state(&self, name: &str) -> Option<FieldState> {
        self.read().fields.get(name).cloned()
    }

    fn on_change(&self, name: &str, trigger: &FieldTrigger) {
        if let Some(hook) = &self.on_change {
            hook(name, trigger);
        }
    }
}
