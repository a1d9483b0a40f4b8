//! Server-rendered HTML.
//!
//! Every function here is a pure function from state to markup. Interactive
//! parts (chat widget, contact form) are HTMX fragments that the handlers in
//! [`crate::pages`] re-render and swap in place.
//!
//! # Structure
//!
//! - [`page`]: document shell and static marketing sections
//! - [`widget`]: the support chat widget
//! - [`contact_form`]: the contact section

pub mod contact_form;
pub mod page;
pub mod widget;

/// Escape text for use in element content and quoted attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
