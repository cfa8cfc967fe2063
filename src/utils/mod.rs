//! Utility modules for tls-pem-loader
//!
//! This module contains error types and terminal output helpers.

pub mod error;
pub mod output;

pub use error::{ConfigError, DecryptError, ErrorKind, LoadError, Result};
