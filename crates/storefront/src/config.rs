//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ECOSTORE_HOST` - Bind address (default: 127.0.0.1)
//! - `ECOSTORE_PORT` - Listen port (default: 5000)
//! - `ECOSTORE_BASE_URL` - Public URL of the API (default: <http://localhost:5000>)
//! - `ECOSTORE_ALLOWED_ORIGINS` - Comma-separated CORS origins
//!   (default: <http://localhost:3000>,<http://localhost:3001>)
//! - `ECOSTORE_TAX_RATE` - GST rate as a fraction (default: 0.18)
//! - `ECOSTORE_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 4000)
//! - `ECOSTORE_SHIPPING_FEE` - Flat shipping fee (default: 99)
//! - `ECOSTORE_SEED_DEMO` - Load the demo catalog, user and orders (default: true)
//! - `ECOSTORE_RATE_LIMIT` - Rate limit the auth endpoints (default: true)
//! - `ECOSTORE_LOG_JSON` - Emit JSON logs (default: false)
//! - `ECOSTORE_ADMIN_EMAIL` / `ECOSTORE_ADMIN_PASSWORD` - Bootstrap an admin
//!   account at startup. Both or neither; the password must be high entropy.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use ecostore_core::{Email, Price, PricingPolicy};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ADMIN_PASSWORD_LENGTH: usize = 12;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "admin123",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
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
    /// Public base URL for the API
    pub base_url: String,
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,
    /// Tax, shipping and free-shipping rules
    pub pricing: PricingPolicy,
    /// Load demo data on startup
    pub seed_demo: bool,
    /// Rate limit the auth endpoints
    pub rate_limit: bool,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Admin account to create or promote on startup
    pub admin: Option<AdminBootstrap>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Credentials for the bootstrap admin account.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: Email,
    pub password: SecretString,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the admin password
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_env_or_default(&env, "ECOSTORE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ECOSTORE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(&env, "ECOSTORE_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ECOSTORE_PORT".to_string(), e.to_string()))?;
        let base_url = parse_base_url(&get_env_or_default(
            &env,
            "ECOSTORE_BASE_URL",
            "http://localhost:5000",
        ))?;
        let allowed_origins =
            parse_origins(&get_env_or_default(&env, "ECOSTORE_ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS))?;

        let defaults = PricingPolicy::default();
        let tax_rate = get_decimal(&env, "ECOSTORE_TAX_RATE")?.unwrap_or(defaults.tax_rate);
        let threshold = get_decimal(&env, "ECOSTORE_FREE_SHIPPING_THRESHOLD")?
            .map_or(defaults.free_shipping_threshold, Price::new);
        let fee = get_decimal(&env, "ECOSTORE_SHIPPING_FEE")?
            .map_or(defaults.shipping_fee, Price::new);
        let pricing = PricingPolicy::new(tax_rate, threshold, fee)
            .map_err(|e| ConfigError::InvalidEnvVar("ECOSTORE_TAX_RATE".to_string(), e.to_string()))?;

        Ok(Self {
            host,
            port,
            base_url,
            allowed_origins,
            pricing,
            seed_demo: get_bool(&env, "ECOSTORE_SEED_DEMO", true)?,
            rate_limit: get_bool(&env, "ECOSTORE_RATE_LIMIT", true)?,
            log_json: get_bool(&env, "ECOSTORE_LOG_JSON", false)?,
            admin: AdminBootstrap::from_lookup(&env)?,
            sentry_dsn: get_optional_env(&env, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&env, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for local development and tests: loopback on an
    /// ephemeral port, demo data, no rate limiting.
    #[must_use]
    pub fn local() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: "http://localhost:5000".to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .split(',')
                .map(str::to_string)
                .collect(),
            pricing: PricingPolicy::default(),
            seed_demo: true,
            rate_limit: false,
            log_json: false,
            admin: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies must be marked `Secure`.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl AdminBootstrap {
    fn from_lookup(env: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let email = get_optional_env(env, "ECOSTORE_ADMIN_EMAIL");
        let password = get_optional_env(env, "ECOSTORE_ADMIN_PASSWORD");
        match (email, password) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar(
                "ECOSTORE_ADMIN_PASSWORD".to_string(),
            )),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar(
                "ECOSTORE_ADMIN_EMAIL".to_string(),
            )),
            (Some(email), Some(password)) => {
                let email = Email::parse(&email).map_err(|e| {
                    ConfigError::InvalidEnvVar("ECOSTORE_ADMIN_EMAIL".to_string(), e.to_string())
                })?;
                let password = SecretString::from(password);
                validate_admin_password(&password, "ECOSTORE_ADMIN_PASSWORD")?;
                Ok(Some(Self { email, password }))
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    env(key).filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(env, key).unwrap_or_else(|| default.to_string())
}

fn get_bool(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = get_optional_env(env, key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn get_decimal(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Decimal>, ConfigError> {
    get_optional_env(env, key)
        .map(|value| {
            value
                .trim()
                .parse::<Decimal>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

fn parse_base_url(value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("ECOSTORE_BASE_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "ECOSTORE_BASE_URL".to_string(),
            "must be an http(s) URL with a host".to_string(),
        ));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn parse_origins(value: &str) -> Result<Vec<String>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            let url = Url::parse(origin).map_err(|e| {
                ConfigError::InvalidEnvVar("ECOSTORE_ALLOWED_ORIGINS".to_string(), e.to_string())
            })?;
            // Browsers send origins without a trailing slash.
            Ok(url.origin().ascii_serialization())
        })
        .collect()
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is long enough, not a placeholder, and has
/// sufficient entropy.
fn validate_admin_password(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.chars().count() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_ADMIN_PASSWORD_LENGTH} characters"),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated password."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:3001"]
        );
        assert_eq!(config.pricing, PricingPolicy::default());
        assert!(config.seed_demo);
        assert!(config.rate_limit);
        assert!(!config.log_json);
        assert!(config.admin.is_none());
        assert!(!config.secure_cookies());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("ECOSTORE_PORT", "8080"),
            ("ECOSTORE_BASE_URL", "https://shop.example.in"),
            ("ECOSTORE_ALLOWED_ORIGINS", "https://shop.example.in/ , https://admin.example.in"),
            ("ECOSTORE_TAX_RATE", "0.05"),
            ("ECOSTORE_SHIPPING_FEE", "49"),
            ("ECOSTORE_SEED_DEMO", "off"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.secure_cookies());
        assert_eq!(
            config.allowed_origins,
            vec!["https://shop.example.in", "https://admin.example.in"]
        );
        assert_eq!(config.pricing.tax_rate, Decimal::new(5, 2));
        assert_eq!(config.pricing.shipping_fee, Price::from_rupees(49));
        assert!(!config.seed_demo);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("ECOSTORE_PORT", "http")])),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("ECOSTORE_RATE_LIMIT", "maybe")])),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("ECOSTORE_BASE_URL", "ftp://x")])),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("ECOSTORE_TAX_RATE", "1.5")])),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }

    #[test]
    fn test_admin_requires_both_variables() {
        let result =
            StorefrontConfig::from_lookup(lookup(&[("ECOSTORE_ADMIN_EMAIL", "ops@ecostore.in")]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(key)) if key == "ECOSTORE_ADMIN_PASSWORD"));
    }

    #[test]
    fn test_admin_password_validation() {
        let weak = StorefrontConfig::from_lookup(lookup(&[
            ("ECOSTORE_ADMIN_EMAIL", "ops@ecostore.in"),
            ("ECOSTORE_ADMIN_PASSWORD", "changeme-now-please"),
        ]));
        assert!(matches!(weak, Err(ConfigError::InsecureSecret(..))));

        let config = StorefrontConfig::from_lookup(lookup(&[
            ("ECOSTORE_ADMIN_EMAIL", "Ops@EcoStore.in"),
            ("ECOSTORE_ADMIN_PASSWORD", "aB3$xY9!mK2@nL5#"),
        ]))
        .unwrap();
        let admin = config.admin.unwrap();
        assert_eq!(admin.email.as_str(), "ops@ecostore.in");
        assert!(!format!("{admin:?}").contains("aB3$"));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_local_config() {
        let config = StorefrontConfig::local();
        assert_eq!(config.port, 0);
        assert!(!config.rate_limit);
        assert!(config.seed_demo);
    }
}
