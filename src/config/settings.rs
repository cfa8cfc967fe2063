//! TLS material configuration
//!
//! Names the certificate file, the private key file, and the key pass-phrase.

use crate::cert_ops::{load_key_pair, KeyPair};
use crate::utils::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Paths to a certificate and its private key, plus the key pass-phrase
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsConfig {
    /// Path of the certificate PEM file
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cert: String,

    /// Path of the private key PEM file
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,

    /// Pass-phrase for the private key; empty when the key is not encrypted
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pass_phrase: String,
}

impl TlsConfig {
    pub fn new(cert: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            cert: cert.into(),
            key: key.into(),
            pass_phrase: String::new(),
        }
    }

    pub fn with_pass_phrase(mut self, pass_phrase: impl Into<String>) -> Self {
        self.pass_phrase = pass_phrase.into();
        self
    }

    /// Load settings from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    /// Load the configured key pair
    pub fn load_key_pair(&self) -> Result<KeyPair> {
        load_key_pair(&self.cert, &self.key, &self.pass_phrase)
    }
}

impl fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pass_phrase = if self.pass_phrase.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("TlsConfig")
            .field("cert", &self.cert)
            .field("key", &self.key)
            .field("pass_phrase", &pass_phrase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let config = TlsConfig::default();
        assert!(config.cert.is_empty());
        assert!(config.key.is_empty());
        assert!(config.pass_phrase.is_empty());
    }

    #[test]
    fn test_parse_toml() {
        let config = TlsConfig::from_toml_str(
            r#"
            cert = "/certs/test.crt"
            key = "/certs/test_rsa"
            passPhrase = "testing"
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            TlsConfig::new("/certs/test.crt", "/certs/test_rsa").with_pass_phrase("testing")
        );
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let config = TlsConfig::from_toml_str(r#"cert = "/certs/test.crt""#).unwrap();
        assert_eq!(config.key, "");
        assert_eq!(config.pass_phrase, "");
    }

    #[test]
    fn test_invalid_toml() {
        let err = TlsConfig::from_toml_str("cert = [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = TlsConfig::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_debug_redacts_pass_phrase() {
        let config = TlsConfig::new("a", "b").with_pass_phrase("testing");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("testing"));
        assert!(printed.contains("<redacted>"));
    }
}
