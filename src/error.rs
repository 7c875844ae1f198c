//! Error types for VIPS Review.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("VIPS error: {0}")]
    Vips(#[from] VipsError),

    #[error("Datetime error: {0}")]
    DateTime(#[from] DateTimeError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while talking to the VIPS API.
///
/// The public client operations never return these; they are folded into an
/// unsuccessful `ApiResponse` body at the client boundary.
#[derive(Debug, thiserror::Error)]
pub enum VipsError {
    #[error("No response from the VIPS API at {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("Invalid response from the VIPS API at {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

/// VIPS datetime conversion errors.
#[derive(Debug, thiserror::Error)]
pub enum DateTimeError {
    #[error("Malformed VIPS datetime {value:?}: {reason}")]
    Malformed { value: String, reason: String },

    #[error("Unparseable datetime {value:?}: {source}")]
    Parse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Email rendering and delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Unknown email template: {0}")]
    UnknownTemplate(String),

    #[error("Template {name} failed to render: {reason}")]
    RenderFailed { name: String, reason: String },

    #[error("Invalid email address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
