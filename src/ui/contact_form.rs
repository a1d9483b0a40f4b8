//! Contact section markup.

use std::fmt::Write;
use std::time::Duration;

use super::escape;
use crate::contact::{ContactFormState, Field, LICENSE_TYPES};

/// Render the `#contact` section for `state`.
///
/// After a successful submit the section shows the confirmation banner and
/// asks for a fresh form once `confirmation` has elapsed.
#[must_use]
pub fn render_contact_section(state: &ContactFormState, confirmation: Duration) -> String {
    let mut html = String::from(
        r##"<section id="contact" class="section section--contact" hx-target="this" hx-swap="outerHTML">
<div class="container container--narrow">
<h2 class="section__title">Get in Touch</h2>
"##,
    );

    if state.submitted {
        let _ = write!(
            html,
            r#"<div class="banner banner--success" role="status" hx-get="/contact" hx-trigger="load delay:{}ms">
<strong>Message sent successfully!</strong>
<span>Thank you for reaching out. We'll get back to you within 24 hours.</span>
</div>
"#,
            confirmation.as_millis()
        );
    }

    html.push_str(r#"<form class="contact-form" hx-post="/contact" novalidate>"#);
    html.push_str(r#"<div class="contact-form__grid">"#);
    text_field(&mut html, state, Field::Name, "Name", "text", true);
    text_field(&mut html, state, Field::Email, "Email", "email", true);
    text_field(&mut html, state, Field::Company, "Company", "text", false);
    license_select(&mut html, state);
    html.push_str("</div>");
    message_field(&mut html, state);
    html.push_str(
        r#"<button type="submit" class="button button--primary"><span>Send Message</span></button>
</form>
</div>
</section>"#,
    );
    html
}

fn label(html: &mut String, field: Field, text: &str, starred: bool) {
    let star = if starred { r#" <span class="required">*</span>"# } else { "" };
    let _ = write!(html, r#"<label for="{}">{text}{star}</label>"#, field.key());
}

fn error(html: &mut String, state: &ContactFormState, field: Field) {
    if let Some(message) = state.errors.get(&field) {
        let _ = write!(
            html,
            r#"<p id="{}-error" class="field__error" role="alert">{}</p>"#,
            field.key(),
            escape(message)
        );
    }
}

fn invalid_attrs(state: &ContactFormState, field: Field) -> String {
    if state.errors.contains_key(&field) {
        format!(r#" aria-invalid="true" aria-describedby="{}-error""#, field.key())
    } else {
        String::new()
    }
}

fn text_field(
    html: &mut String,
    state: &ContactFormState,
    field: Field,
    text: &str,
    input_type: &str,
    starred: bool,
) {
    html.push_str(r#"<div class="field">"#);
    label(html, field, text, starred);
    let _ = write!(
        html,
        r#"<input type="{input_type}" id="{key}" name="{key}" value="{value}"{invalid}>"#,
        key = field.key(),
        value = escape(state.form.value(field)),
        invalid = invalid_attrs(state, field),
    );
    error(html, state, field);
    html.push_str("</div>");
}

fn license_select(html: &mut String, state: &ContactFormState) {
    let field = Field::LicenseType;
    html.push_str(r#"<div class="field">"#);
    label(html, field, "License Type", true);
    let _ = write!(
        html,
        r#"<select id="{key}" name="{key}"{invalid}><option value="">Select license type</option>"#,
        key = field.key(),
        invalid = invalid_attrs(state, field),
    );
    for (value, text) in LICENSE_TYPES {
        let selected = if state.form.license_type == value { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{value}"{selected}>{text}</option>"#);
    }
    html.push_str("</select>");
    error(html, state, field);
    html.push_str("</div>");
}

fn message_field(html: &mut String, state: &ContactFormState) {
    let field = Field::Message;
    html.push_str(r#"<div class="field field--wide">"#);
    label(html, field, "Message", true);
    let _ = write!(
        html,
        r#"<textarea id="{key}" name="{key}" rows="4"{invalid}>{value}</textarea>"#,
        key = field.key(),
        value = escape(state.form.value(field)),
        invalid = invalid_attrs(state, field),
    );
    error(html, state, field);
    html.push_str("</div>");
}
