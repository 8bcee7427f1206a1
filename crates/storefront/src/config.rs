//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPFRONT_PORT` - Listen port (default: 8080)
//! - `SHOPFRONT_BASE_URL` - Public URL (default: <http://localhost:8080>);
//!   an `https://` URL enables secure session cookies
//! - `SHOPFRONT_ALLOWED_ORIGINS` - Comma-separated CORS origins
//!   (default: <http://localhost:3000>,<http://127.0.0.1:3000>)
//! - `SHOPFRONT_ADMIN_PASSWORD` - Password for the seeded `admin` account
//!   (default: `Admin@123`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::db::seed::DEFAULT_ADMIN_PASSWORD;
use crate::services::auth::MIN_PASSWORD_LENGTH;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "8080";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Origins allowed to make credentialed CORS requests
    pub allowed_origins: Vec<String>,
    /// Password for the seeded admin account
    pub admin_password: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = get_or_default("SHOPFRONT_HOST", DEFAULT_HOST)
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_HOST".to_string(), e.to_string()))?;
        let port = get_or_default("SHOPFRONT_PORT", DEFAULT_PORT)
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_PORT".to_string(), e.to_string()))?;

        let base_url = get_or_default("SHOPFRONT_BASE_URL", DEFAULT_BASE_URL);
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_BASE_URL".to_string(),
                "must start with http:// or https://".to_string(),
            ));
        }

        let allowed_origins =
            parse_origins(&get_or_default("SHOPFRONT_ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS));

        let admin_password = SecretString::from(get_or_default(
            "SHOPFRONT_ADMIN_PASSWORD",
            DEFAULT_ADMIN_PASSWORD,
        ));
        validate_admin_password(&admin_password, "SHOPFRONT_ADMIN_PASSWORD")?;

        Ok(Self {
            host,
            port,
            base_url,
            allowed_origins,
            admin_password,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|env| !env.is_empty()),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            base_url: DEFAULT_BASE_URL.to_string(),
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            admin_password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}

/// The admin password must itself satisfy the password policy.
fn validate_admin_password(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let len = secret.expose_secret().chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_PASSWORD_LENGTH} characters (got {len})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_source(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
        assert_eq!(config.admin_password.expose_secret(), "Admin@123");
        assert!(!config.secure_cookies());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SHOPFRONT_HOST", "0.0.0.0"),
            ("SHOPFRONT_PORT", "9000"),
            ("SHOPFRONT_BASE_URL", "https://shop.example.com"),
            ("SHOPFRONT_ALLOWED_ORIGINS", " https://a.example.com/ ,, https://b.example.com"),
            ("SENTRY_DSN", ""),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
        assert!(config.secure_cookies());
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("SHOPFRONT_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPFRONT_PORT"));
    }

    #[test]
    fn test_invalid_host() {
        let err = load(&[("SHOPFRONT_HOST", "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPFRONT_HOST"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(load(&[("SHOPFRONT_BASE_URL", "shop.example.com")]).is_err());
    }

    #[test]
    fn test_short_admin_password_rejected() {
        let err = load(&[("SHOPFRONT_ADMIN_PASSWORD", "abc")]).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_debug_redacts_admin_password() {
        let config = load(&[("SHOPFRONT_ADMIN_PASSWORD", "super_secret_admin")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("super_secret_admin"));
    }
}
