//! Custom error types for tls-pem-loader
//!
//! Every failure is returned to the caller as-is. Nothing here is logged or
//! retried; [`LoadError::kind`] groups the variants for callers that only care
//! about the broad category.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for certificate and key loading
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("private key file contains no PEM data")]
    NoKeyPemData,

    #[error("failed to find any PEM data in certificate input")]
    NoCertificatePemData,

    #[error("failed to find certificate PEM data in certificate input, but did find a private key; PEM inputs may have been switched")]
    CertificateInputHoldsKey,

    #[error("found a certificate rather than a key in the PEM for the private key")]
    KeyInputHoldsCertificate,

    #[error("failed to find PEM block with type ending in \"PRIVATE KEY\" in key input")]
    NoPrivateKeyBlock,

    #[error("failed to parse certificate: {message}")]
    CertificateParse { message: String },

    #[error("failed to parse private key: {message}")]
    KeyParse { message: String },

    #[error("key decryption failed: {0}")]
    Decrypt(#[from] DecryptError),

    #[error("private key type does not match public key type")]
    KeyTypeMismatch,

    #[error("private key does not match public key")]
    KeyMismatch,

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LoadError {
    /// Build an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }

    /// The broad category this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Io { .. } => ErrorKind::Io,
            LoadError::NoKeyPemData
            | LoadError::NoCertificatePemData
            | LoadError::CertificateInputHoldsKey
            | LoadError::KeyInputHoldsCertificate
            | LoadError::NoPrivateKeyBlock => ErrorKind::Format,
            LoadError::CertificateParse { .. } | LoadError::KeyParse { .. } => ErrorKind::Parse,
            LoadError::Decrypt(_) => ErrorKind::Decryption,
            LoadError::KeyTypeMismatch | LoadError::KeyMismatch => ErrorKind::Consistency,
            LoadError::Tls(_) => ErrorKind::Tls,
            LoadError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<rustls::Error> for LoadError {
    fn from(err: rustls::Error) -> Self {
        LoadError::Tls(err.to_string())
    }
}

/// Broad failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A path was missing, unreadable, or could not be walked
    Io,
    /// PEM data was absent where it was required
    Format,
    /// A PEM block held malformed DER
    Parse,
    /// An encrypted key could not be decrypted
    Decryption,
    /// Certificate and key do not belong together
    Consistency,
    /// rustls rejected the loaded material
    Tls,
    /// The configuration file could not be used
    Config,
}

/// Private key decryption errors
#[derive(Error, Debug)]
pub enum DecryptError {
    #[error("no DEK-Info header in block")]
    MissingDekInfo,

    #[error("malformed DEK-Info header: {value}")]
    MalformedDekInfo { value: String },

    #[error("unknown encryption mode: {mode}")]
    UnknownCipher { mode: String },

    #[error("incorrect IV size for {cipher}: expected {expected} bytes, got {actual}")]
    InvalidIvSize {
        cipher: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("encrypted PEM data is not a multiple of the block size")]
    InvalidLength,

    #[error("decryption pass-phrase incorrect")]
    IncorrectPassPhrase,

    #[error("PKCS#8 decryption failed: {message}")]
    Pkcs8 { message: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },
}

/// Result type alias using LoadError
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_groups_variants() {
        let io = LoadError::io("/missing", std::io::ErrorKind::NotFound.into());
        assert_eq!(io.kind(), ErrorKind::Io);
        assert_eq!(LoadError::NoKeyPemData.kind(), ErrorKind::Format);
        assert_eq!(
            LoadError::Decrypt(DecryptError::IncorrectPassPhrase).kind(),
            ErrorKind::Decryption
        );
        assert_eq!(LoadError::KeyMismatch.kind(), ErrorKind::Consistency);
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let err = LoadError::io("/certs/test.crt", std::io::ErrorKind::NotFound.into());
        assert!(err.to_string().starts_with("failed to read /certs/test.crt"));
        let source = err.source().and_then(|s| s.downcast_ref::<std::io::Error>());
        assert_eq!(
            source.map(|e| e.kind()),
            Some(std::io::ErrorKind::NotFound)
        );
    }

    #[test]
    fn test_no_pem_message() {
        assert_eq!(
            LoadError::NoKeyPemData.to_string(),
            "private key file contains no PEM data"
        );
    }
}
