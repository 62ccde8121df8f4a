//! Confirmation email content.
//!
//! Rendering is pure. The only input that varies between calls with the same
//! recipient is the generation timestamp shown in the footer.

use askama::Template;
use chrono::{DateTime, Utc};

/// Rendered confirmation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Template)]
#[template(path = "confirmation.html")]
struct HtmlBody<'a> {
    name: &'a str,
    email: &'a str,
    generated: &'a str,
}

#[derive(Template)]
#[template(path = "confirmation.txt")]
struct TextBody<'a> {
    subject: &'a str,
    name: &'a str,
    email: &'a str,
    generated: &'a str,
}

/// Render the welcome email for `name` at `email`.
///
/// The HTML body is autoescaped. The subject and the text body carry `name`
/// and `email` unchanged.
///
/// # Errors
///
/// Returns the template engine error when a body fails to render.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use registration::domain::confirmation_template::render;
///
/// let content = render("Ada", "ada@example.com", Utc::now()).expect("template renders");
/// assert_eq!(content.subject, "Welcome to ScriptChain Email System, Ada!");
/// assert!(content.text.contains("ada@example.com"));
/// ```
pub fn render(
    name: &str,
    email: &str,
    generated_at: DateTime<Utc>,
) -> askama::Result<ConfirmationContent> {
    let generated = generated_at.format(GENERATED_AT_FORMAT).to_string();
    let subject = format!("Welcome to ScriptChain Email System, {name}!");
    let html = HtmlBody {
        name,
        email,
        generated: &generated,
    }
    .render()?;
    let text = TextBody {
        subject: &subject,
        name,
        email,
        generated: &generated,
    }
    .render()?;
    Ok(ConfirmationContent {
        subject,
        html,
        text,
    })
}
