//! Command implementations.

pub mod catalog;
pub mod password;
pub mod quote;
pub mod tier;

use thiserror::Error;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ecostore_storefront::config::ConfigError),

    #[error(transparent)]
    Promo(#[from] ecostore_core::PromoError),

    #[error("no product with id {0} in the demo catalog")]
    UnknownProduct(ecostore_core::ProductId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Password(#[from] ecostore_storefront::services::AuthError),

    #[error("no password given on stdin")]
    EmptyPassword,
}
