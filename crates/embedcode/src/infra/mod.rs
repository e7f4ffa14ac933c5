//! Infrastructure adapters for configuration, logging, and source collaborators.

pub mod config;
pub mod http;
pub mod logging;
pub mod store;
