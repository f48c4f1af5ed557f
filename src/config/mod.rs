//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read variables, apply defaults, parse)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig / UserServiceConfig (validated, immutable)
//!     → passed by reference to every component constructor
//! ```
//!
//! # Design Decisions
//! - Environment is read exactly once, in the binary's `main`
//! - Missing required variables are fatal before any listener is bound
//! - Loading takes an injectable lookup so tests never touch process state

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    gateway_config_from, load_gateway_config, load_user_service_config, user_service_config_from,
    ConfigError,
};
pub use schema::{DatabaseConfig, Environment, GatewayConfig, ListenerConfig, UserServiceConfig};
