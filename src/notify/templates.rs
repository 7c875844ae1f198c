//! Notification email templates.
//!
//! Templates are embedded at build time and rendered with Handlebars.
//! Variables: `subject`, `body`, `full_name`, `prohibition_number`.
//! Missing variables render as empty strings.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::NotifyError;

/// Subject used when a template name is not recognised.
pub const UNKNOWN_TEMPLATE_SUBJECT: &str = "Unknown template";

const TEMPLATES: &[(&str, &str)] = &[
    ("admin_notice.html", include_str!("../../templates/admin_notice.html")),
    (
        "application_accepted.html",
        include_str!("../../templates/application_accepted.html"),
    ),
    (
        "last_name_mismatch.html",
        include_str!("../../templates/last_name_mismatch.html"),
    ),
    (
        "prohibition_not_found.html",
        include_str!("../../templates/prohibition_not_found.html"),
    ),
    (
        "review_date_confirmed.html",
        include_str!("../../templates/review_date_confirmed.html"),
    ),
    (
        "select_review_date.html",
        include_str!("../../templates/select_review_date.html"),
    ),
];

/// Subject line for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailContent {
    pub template_name: String,
    pub subject: String,
}

/// A fully rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmailContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prohibition_number: Option<String>,
}

impl EmailContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn prohibition_number(mut self, number: impl Into<String>) -> Self {
        self.prohibition_number = Some(number.into());
        self
    }
}

fn subject_for(template_name: &str, prohibition_number: &str) -> Option<String> {
    let n = prohibition_number;
    let subject = match template_name {
        "admin_notice.html" => format!("Administrative notice {n}"),
        "application_accepted.html" => {
            format!("Application received - Driving Prohibition Review {n}")
        }
        "last_name_mismatch.html" => {
            format!("Prohibition Number or Name Don't Match - Driving Prohibition Review {n}")
        }
        "prohibition_not_found.html" => {
            format!("Prohibition Not Found - Driving Prohibition Review {n}")
        }
        "review_date_confirmed.html" => {
            format!("Review Date Confirmed - Driving Prohibition Review {n}")
        }
        "select_review_date.html" => {
            format!("Re: Driving Prohibition Review - Select a Review Date {n}")
        }
        _ => return None,
    };
    Some(subject)
}

/// Resolve the subject for a template. Unknown names get
/// [`UNKNOWN_TEMPLATE_SUBJECT`] instead of an error.
pub fn get_email_content(template_name: &str, prohibition_number: &str) -> EmailContent {
    let subject = subject_for(template_name, prohibition_number).unwrap_or_else(|| {
        tracing::warn!(template = %template_name, "Unknown email template");
        UNKNOWN_TEMPLATE_SUBJECT.to_string()
    });
    EmailContent {
        template_name: template_name.to_string(),
        subject,
    }
}

/// Handlebars registry holding every notification template.
pub struct EmailRenderer {
    handlebars: Handlebars<'static>,
}

impl EmailRenderer {
    pub fn new() -> Result<Self, NotifyError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(escape_markup);

        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, *source)
                .map_err(|e| NotifyError::RenderFailed {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
        }
        Ok(Self { handlebars })
    }

    pub fn has_template(&self, template_name: &str) -> bool {
        self.handlebars.has_template(template_name)
    }

    /// Render a template to HTML.
    pub fn render(&self, template_name: &str, context: &EmailContext) -> Result<String, NotifyError> {
        if !self.has_template(template_name) {
            return Err(NotifyError::UnknownTemplate(template_name.to_string()));
        }
        self.handlebars
            .render(template_name, context)
            .map_err(|e| NotifyError::RenderFailed {
                name: template_name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Render a template with its standard subject for `prohibition_number`.
    ///
    /// A subject already set on `context` is kept.
    pub fn render_email(
        &self,
        template_name: &str,
        prohibition_number: &str,
        context: EmailContext,
    ) -> Result<RenderedEmail, NotifyError> {
        let subject = match &context.subject {
            Some(subject) => subject.clone(),
            None => get_email_content(template_name, prohibition_number).subject,
        };
        let context = EmailContext {
            subject: Some(subject.clone()),
            prohibition_number: Some(prohibition_number.to_string()),
            ..context
        };
        let html = self.render(template_name, &context)?;
        Ok(RenderedEmail { subject, html })
    }
}

/// Escape only the characters that can open markup or an entity.
///
/// Quotes stay verbatim so subjects and names like "O'Brien" read as typed.
/// No template interpolates into an attribute value.
fn escape_markup(data: &str) -> String {
    let mut escaped = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
