//! Configuration loading from the process environment.

use std::str::FromStr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{
    DatabaseConfig, Environment, GatewayConfig, ListenerConfig, UserServiceConfig,
    DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_DB_PORT, DEFAULT_GATEWAY_PORT, DEFAULT_USER_SERVICE_PORT,
};
use crate::config::validation::{
    validate_gateway_config, validate_user_service_config, ValidationError,
};
use crate::lifecycle::shutdown::GRACE_PERIOD;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load the gateway configuration from the process environment.
pub fn load_gateway_config() -> Result<GatewayConfig, ConfigError> {
    gateway_config_from(|key| std::env::var(key).ok())
}

/// Load the user service configuration from the process environment.
pub fn load_user_service_config() -> Result<UserServiceConfig, ConfigError> {
    user_service_config_from(|key| std::env::var(key).ok())
}

/// Build the gateway configuration from an arbitrary variable lookup.
pub fn gateway_config_from<F>(lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = Vars(lookup);

    let config = GatewayConfig {
        listener: ListenerConfig::new(env.parsed_or("PORT", DEFAULT_GATEWAY_PORT)?),
        user_service_url: env.url("USER_SERVICE_URL")?,
        product_service_url: env.url("PRODUCT_SERVICE_URL")?,
        environment: env.optional("ENVIRONMENT").map(Environment::new).unwrap_or_default(),
        shutdown_grace: GRACE_PERIOD,
    };

    validate_gateway_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the user service configuration from an arbitrary variable lookup.
pub fn user_service_config_from<F>(lookup: F) -> Result<UserServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = Vars(lookup);

    let database = DatabaseConfig {
        host: env.required("DB_HOST")?,
        port: env.parsed_or("DB_PORT", DEFAULT_DB_PORT)?,
        user: env.required("DB_USER")?,
        password: env.required("DB_PASSWORD")?,
        name: env.required("DB_NAME")?,
        max_connections: env.parsed_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
    };

    let config = UserServiceConfig {
        listener: ListenerConfig::new(env.parsed_or("PORT", DEFAULT_USER_SERVICE_PORT)?),
        database,
        environment: env.optional("ENVIRONMENT").map(Environment::new).unwrap_or_default(),
        shutdown_grace: GRACE_PERIOD,
    };

    validate_user_service_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Variable accessor; empty values count as unset.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, var: &str) -> Option<String> {
        (self.0)(var).filter(|value| !value.is_empty())
    }

    fn required(&self, var: &'static str) -> Result<String, ConfigError> {
        self.optional(var).ok_or(ConfigError::Missing(var))
    }

    fn parsed_or<T>(&self, var: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(var) {
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn url(&self, var: &'static str) -> Result<Url, ConfigError> {
        let raw = self.required(var)?;
        Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        })
    }
}
