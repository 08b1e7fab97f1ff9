//! Logging setup.
//!
//! Everything in the engine logs through the `log` facade; this module only wires
//! `env_logger` as the backend.

mod init;

pub use init::{init_logging, LoggingConfig};
