//! A labelled field wrapper built on the render-function variant.

use formsync::forms::render::escape;
use formsync::forms::{FieldConfig, FieldEvents, FieldState, FormState};

/// Wraps an `<input>` of `input_type` in label and error markup.
pub fn field_wrap(label: &str, name: &str, input_type: &str) -> FieldConfig {
    let label = label.to_string();
    let input_type_attr = input_type.to_string();
    FieldConfig::new(name)
        .input_type(input_type)
        .render(move |events: &FieldEvents<'_>, field: &FieldState, form: &FormState| {
            tracing::trace!(field = ?field, revision = form.revision, "rendering field wrap");
            let name = escape(events.name());
            format!(
                concat!(
                    r#"<div class="field-wrap">"#,
                    r#"<label for="field-{name}">{label}</label>"#,
                    r#"<div class="input"><input type="{ty}" id="field-{name}" name="{name}" value="{value}" /></div>"#,
                    r#"<div class="error">{error}</div>"#,
                    "</div>"
                ),
                name = name,
                label = escape(&label),
                ty = escape(&input_type_attr),
                value = escape(&field.display_value()),
                error = escape(field.error.as_deref().unwrap_or_default()),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsync::forms::{FieldUnit, FormAggregate, RawEvent};

    #[test]
    fn test_wrap_renders_label_input_and_error() {
        let form = FormAggregate::new("login")
            .with_validator(crate::login_validator())
            .into_shared();
        let unit = FieldUnit::mount(field_wrap("Email", "email", "email"), form).unwrap();
        unit.handle_change(RawEvent::input("x<y")).unwrap();

        let html = unit.render().unwrap();
        assert!(html.contains(r#"<label for="field-email">Email</label>"#));
        assert!(html.contains(r#"type="email""#));
        assert!(html.contains(r#"value="x&lt;y""#));
        assert!(html.contains(r#"<div class="error">Invalid Email</div>"#));
    }
}
