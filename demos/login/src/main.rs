//! # formsync login demo
//!
//! A login form with a single `email` field, driven from the command line:
//!
//! - **Field**: mounted with a render-function wrapper (label, input, error)
//! - **Validation**: the stock email validator
//! - **Events**: each value given on the command line is replayed as
//!   focus, change and blur
//! - **Settings**: defaults, an optional TOML file, and `FORMSYNC_*` overrides
//!
//! ## Running
//!
//! ```bash
//! cargo run --package login-demo -- not-an-email a@b.com
//! ```

mod wrap;

use std::process::ExitCode;

use formsync::core::logging::setup_logging;
use formsync::core::settings_loader;
use formsync::forms::validators::{EmailValidator, FieldValidators};
use formsync::forms::{
    FieldState, FieldStatePatch, FieldTrigger, FieldUnit, FormAggregate, FormCapabilities,
    FormEvent, FormState, RawEvent,
};
use formsync::{FormResult, Settings};

use wrap::field_wrap;

fn build_cli() -> clap::Command {
    clap::Command::new("login-demo")
        .about("Replays typed values into a login form and prints the resulting state")
        .arg(
            clap::Arg::new("values")
                .value_name("VALUE")
                .num_args(0..)
                .help("Values typed into the email field, in order"),
        )
        .arg(
            clap::Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("TOML settings file"),
        )
        .arg(
            clap::Arg::new("log-level")
                .long("log-level")
                .value_name("FILTER")
                .help("Overrides the configured log filter"),
        )
        .arg(
            clap::Arg::new("render")
                .long("render")
                .action(clap::ArgAction::SetTrue)
                .help("Print the field markup after every value"),
        )
}

fn load_settings(matches: &clap::ArgMatches) -> FormResult<Settings> {
    let mut settings = match matches.get_one::<String>("config") {
        Some(path) => {
            tracing::info!("Loading settings from {path}");
            settings_loader::from_toml_file_with_env(path)?
        }
        None => settings_loader::from_env(),
    };
    if let Some(level) = matches.get_one::<String>("log-level") {
        settings.log_level.clone_from(level);
    }
    Ok(settings)
}

/// The validator used by the login form.
pub fn login_validator() -> FieldValidators {
    FieldValidators::new().rule("email", EmailValidator::new())
}

fn build_form(settings: Settings) -> FormAggregate {
    let form = FormAggregate::new("login")
        .with_settings(settings)
        .with_validator(login_validator())
        .with_on_change(|name: &str, trigger: &FieldTrigger| {
            tracing::debug!(field = name, ?trigger, "form changed");
        });
    form.subscribe("logger", |event: &FormEvent| {
        tracing::debug!(field = ?event.name(), revision = event.revision(), "form event");
    });
    form
}

/// Replays `values` into a fresh login form and returns the final state.
fn run(settings: Settings, values: &[String], render: bool) -> FormResult<FormState> {
    let form = build_form(settings).into_shared();
    let email = FieldUnit::mount(field_wrap("Email", "email", "email"), form.clone())?;

    for value in values {
        let events = email.events();
        events.on_focus(RawEvent::blank())?;
        let update = events.on_change(RawEvent::input(value.as_str()))?;
        events.on_blur(RawEvent::blank())?;

        match &update.field.error {
            Some(error) => tracing::warn!(value = %value, error = %error, "email rejected"),
            None => tracing::info!(value = %value, "email accepted"),
        }
        if render {
            if let Some(markup) = email.render() {
                println!("{markup}");
            }
        }
    }

    let mut submitted = None;
    let patch = FieldStatePatch::new().touched(true);
    form.set_field_state_then("email", patch, &mut |field: &FieldState, state: &FormState| {
        tracing::info!(
            valid = state.is_valid(),
            error = ?field.error,
            revision = state.revision,
            "form submitted"
        );
        submitted = Some(state.clone());
    })?;
    Ok(submitted.unwrap_or_else(|| form.get_form_state()))
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();

    let settings = match load_settings(&matches) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&settings);

    let values: Vec<String> = matches
        .get_many::<String>("values")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();

    let state = match run(settings, &values, matches.get_flag("render")) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("login demo failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match state.to_json().and_then(|json| Ok(serde_json::to_string_pretty(&json)?)) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("could not serialize form state: {e}");
            return ExitCode::FAILURE;
        }
    }

    if state.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
