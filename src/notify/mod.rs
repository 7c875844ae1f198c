//! Applicant and administrator notifications.

pub mod mailer;
pub mod templates;

pub use mailer::Mailer;
pub use templates::{EmailContent, EmailContext, EmailRenderer, RenderedEmail, get_email_content};
