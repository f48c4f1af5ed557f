//! HTTP middleware shared by both services.

pub mod access_log;
