//! Configuration schema definitions.
//!
//! Both services are configured from the environment once at startup.
//! The resulting structs are immutable and passed by reference to every
//! component constructor.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use url::Url;

use crate::lifecycle::shutdown::GRACE_PERIOD;

/// Default gateway port.
pub const DEFAULT_GATEWAY_PORT: u16 = 8080;
/// Default user service port.
pub const DEFAULT_USER_SERVICE_PORT: u16 = 8081;
/// Default PostgreSQL port.
pub const DEFAULT_DB_PORT: u16 = 5432;
/// Default connection pool size.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Deployment environment name.
///
/// Only `production` changes behavior (JSON logs); any other value is kept
/// verbatim for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment(String);

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_production(&self) -> bool {
        self.0.eq_ignore_ascii_case("production")
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self("development".to_string())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// TCP port bound on all interfaces.
    pub port: u16,
}

impl ListenerConfig {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    /// Address the listener binds to (`0.0.0.0:<port>`).
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// API gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listener: ListenerConfig,

    /// Base URL of the user service (e.g. `http://user-service:8081`).
    pub user_service_url: Url,

    /// Base URL of the product service.
    pub product_service_url: Url,

    pub environment: Environment,

    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace: Duration,
}

impl GatewayConfig {
    pub fn new(user_service_url: Url, product_service_url: Url) -> Self {
        Self {
            listener: ListenerConfig::new(DEFAULT_GATEWAY_PORT),
            user_service_url,
            product_service_url,
            environment: Environment::default(),
            shutdown_grace: GRACE_PERIOD,
        }
    }
}

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub listener: ListenerConfig,
    pub database: DatabaseConfig,
    pub environment: Environment,
    pub shutdown_grace: Duration,
}

/// PostgreSQL connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}
