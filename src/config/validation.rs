//! Configuration validation.
//!
//! Semantic checks run after every variable has been parsed. All problems
//! are reported at once rather than stopping at the first.

use std::fmt;

use url::Url;

use crate::config::schema::{GatewayConfig, UserServiceConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_gateway_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_upstream("USER_SERVICE_URL", &config.user_service_url, &mut errors);
    check_upstream("PRODUCT_SERVICE_URL", &config.product_service_url, &mut errors);
    finish(errors)
}

pub fn validate_user_service_config(
    config: &UserServiceConfig,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if config.database.max_connections == 0 {
        errors.push(ValidationError {
            field: "DB_MAX_CONNECTIONS",
            message: "must be greater than zero".to_string(),
        });
    }
    if config.database.host.trim().is_empty() {
        errors.push(ValidationError {
            field: "DB_HOST",
            message: "must not be blank".to_string(),
        });
    }
    finish(errors)
}

fn check_upstream(field: &'static str, url: &Url, errors: &mut Vec<ValidationError>) {
    if !matches!(url.scheme(), "http" | "https") {
        errors.push(ValidationError {
            field,
            message: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.host_str().map_or(true, str::is_empty) {
        errors.push(ValidationError {
            field,
            message: "missing host".to_string(),
        });
    }
    if url.query().is_some() || url.fragment().is_some() {
        errors.push(ValidationError {
            field,
            message: "must not carry a query or fragment".to_string(),
        });
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
