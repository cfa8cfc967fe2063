//! Configuration module for tls-pem-loader
//!
//! Handles the TLS material configuration and loading it from TOML files.

pub mod settings;

pub use settings::TlsConfig;
