//! Configuration types, built from environment variables.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Connection settings for the VIPS API.
#[derive(Debug, Clone)]
pub struct VipsConfig {
    /// Root URL every endpoint is built from, without a trailing slash.
    pub root_url: String,
    /// HTTP Basic username.
    pub username: String,
    /// HTTP Basic password.
    pub password: SecretString,
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl VipsConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// `VIPS_API_ROOT_URL` is required; credentials default to empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root_url = lookup("VIPS_API_ROOT_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("VIPS_API_ROOT_URL".into()))?;

        if !root_url.starts_with("http://") && !root_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "VIPS_API_ROOT_URL".into(),
                message: format!("expected an http(s) URL, got {root_url:?}"),
            });
        }

        Ok(Self {
            root_url: root_url.trim_end_matches('/').to_string(),
            username: lookup("VIPS_API_USERNAME").unwrap_or_default(),
            password: SecretString::from(lookup("VIPS_API_PASSWORD").unwrap_or_default()),
            log_level: lookup("VIPS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// SMTP settings for notification delivery.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
}

impl MailConfig {
    /// Build config from the process environment.
    /// Returns `None` if `SMTP_HOST` is not set (mail disabled).
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(smtp_host) = lookup("SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_port = match lookup("SMTP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "SMTP_PORT".into(),
                message: e.to_string(),
            })?,
            None => 587,
        };

        let username = lookup("SMTP_USERNAME").unwrap_or_default();
        let password = SecretString::from(lookup("SMTP_PASSWORD").unwrap_or_default());
        let from_address = lookup("SMTP_FROM_ADDRESS").unwrap_or_else(|| username.clone());

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            username,
            password,
            from_address,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn vips_config_reads_all_fields() {
        let config = VipsConfig::from_lookup(lookup_from(&[
            ("VIPS_API_ROOT_URL", "https://vips.example.com/api/"),
            ("VIPS_API_USERNAME", "user"),
            ("VIPS_API_PASSWORD", "secret"),
            ("VIPS_LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.root_url, "https://vips.example.com/api");
        assert_eq!(config.username, "user");
        assert_eq!(config.password.expose_secret(), "secret");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn vips_config_requires_root_url() {
        let err = VipsConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "VIPS_API_ROOT_URL"));
    }

    #[test]
    fn vips_config_rejects_non_http_root() {
        let err =
            VipsConfig::from_lookup(lookup_from(&[("VIPS_API_ROOT_URL", "ftp://vips")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn vips_config_defaults_log_level() {
        let config =
            VipsConfig::from_lookup(lookup_from(&[("VIPS_API_ROOT_URL", "http://localhost")]))
                .unwrap();
        assert_eq!(config.log_level, "info");
        assert!(config.username.is_empty());
    }

    #[test]
    fn mail_config_disabled_without_host() {
        assert!(MailConfig::from_lookup(lookup_from(&[])).unwrap().is_none());
    }

    #[test]
    fn mail_config_defaults() {
        let config = MailConfig::from_lookup(lookup_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USERNAME", "notices@example.com"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.from_address, "notices@example.com");
    }

    #[test]
    fn mail_config_rejects_bad_port() {
        let err = MailConfig::from_lookup(lookup_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "SMTP_PORT"));
    }
}
