//! tls-pem-loader library
//!
//! Loads the X.509 certificates and key pairs a TLS server or client needs
//! from PEM files on disk:
//! - Collecting every certificate under a file or directory tree
//! - Decrypting pass-phrase protected private keys
//! - Pairing a certificate chain with its private key and checking they match
//!
//! # Usage
//!
//! ```rust,no_run
//! use tls_pem_loader::{collect_certificates, root_store, TlsConfig};
//!
//! fn main() -> tls_pem_loader::Result<()> {
//!     let trusted = collect_certificates("/etc/myapp/ca")?;
//!     let roots = root_store(&trusted)?;
//!
//!     let pair = TlsConfig::new("/etc/myapp/tls.crt", "/etc/myapp/tls.key")
//!         .with_pass_phrase("secret")
//!         .load_key_pair()?;
//!     let client = pair.client_auth_config(roots)?;
//!     # let _ = client;
//!     Ok(())
//! }
//! ```

pub mod cert_ops;
pub mod cli;
pub mod config;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use cert_ops::{collect_certificates, load_key_pair, root_store, KeyAlgorithm, KeyPair};
pub use config::TlsConfig;
pub use models::Certificate;
pub use utils::{ErrorKind, LoadError, Result};
