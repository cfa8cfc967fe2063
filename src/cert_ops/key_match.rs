//! Private key parsing and certificate/key pair matching
//!
//! Supports RSA, EC P-256, and EC P-384 keys in PKCS#8, PKCS#1, and SEC1 formats.

use crate::utils::LoadError;
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs1KeyDer, PrivatePkcs8KeyDer, PrivateSec1KeyDer};
use x509_parser::oid_registry::{OID_KEY_TYPE_EC_PUBLIC_KEY, OID_PKCS1_RSAENCRYPTION};
use x509_parser::prelude::*;

/// Algorithm of a parsed private key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa,
    EcP256,
    EcP384,
}

impl KeyAlgorithm {
    fn is_rsa(&self) -> bool {
        matches!(self, KeyAlgorithm::Rsa)
    }
}

impl std::fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyAlgorithm::Rsa => write!(f, "RSA"),
            KeyAlgorithm::EcP256 => write!(f, "EC P-256"),
            KeyAlgorithm::EcP384 => write!(f, "EC P-384"),
        }
    }
}

/// A private key together with the public key derived from it
#[derive(Debug)]
pub struct PrivateKeyInfo {
    /// The SubjectPublicKeyInfo bytes derived from the private key
    pub public_key_spki: Vec<u8>,
    pub algorithm: KeyAlgorithm,
    /// The key in the encoding it was found in
    pub der: PrivateKeyDer<'static>,
}

/// Parse a DER-encoded private key, trying PKCS#1, then PKCS#8, then SEC1.
///
/// The PEM label is not trusted; the encoding is whatever parses.
pub fn parse_private_key(der: &[u8]) -> Result<PrivateKeyInfo, LoadError> {
    if let Ok(info) = parse_pkcs1_rsa(der) {
        return Ok(info);
    }

    if let Some(info) = parse_pkcs8_der(der)? {
        return Ok(info);
    }

    if let Some(info) = parse_sec1_ec(der)? {
        return Ok(info);
    }

    Err(LoadError::KeyParse {
        message: "unknown key type or malformed key (expected RSA, EC P-256 or EC P-384)"
            .to_string(),
    })
}

/// Parse a PKCS#1 RSA private key
fn parse_pkcs1_rsa(der: &[u8]) -> Result<PrivateKeyInfo, LoadError> {
    use rsa::pkcs1::DecodeRsaPrivateKey;

    let rsa_key = rsa::RsaPrivateKey::from_pkcs1_der(der).map_err(|e| LoadError::KeyParse {
        message: format!("Failed to parse PKCS#1 RSA key: {}", e),
    })?;

    Ok(PrivateKeyInfo {
        public_key_spki: rsa_spki(&rsa_key)?,
        algorithm: KeyAlgorithm::Rsa,
        der: PrivateKeyDer::Pkcs1(PrivatePkcs1KeyDer::from(der.to_vec())),
    })
}

/// Parse a PKCS#8 DER-encoded private key and extract SPKI
fn parse_pkcs8_der(der: &[u8]) -> Result<Option<PrivateKeyInfo>, LoadError> {
    use pkcs8::DecodePrivateKey;

    let (public_key_spki, algorithm) = if let Ok(rsa_key) = rsa::RsaPrivateKey::from_pkcs8_der(der)
    {
        (rsa_spki(&rsa_key)?, KeyAlgorithm::Rsa)
    } else if let Ok(ec_key) = p256::SecretKey::from_pkcs8_der(der) {
        (p256_spki(&ec_key)?, KeyAlgorithm::EcP256)
    } else if let Ok(ec_key) = p384::SecretKey::from_pkcs8_der(der) {
        (p384_spki(&ec_key)?, KeyAlgorithm::EcP384)
    } else {
        return Ok(None);
    };

    Ok(Some(PrivateKeyInfo {
        public_key_spki,
        algorithm,
        der: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(der.to_vec())),
    }))
}

/// Parse a SEC1 EC private key
fn parse_sec1_ec(der: &[u8]) -> Result<Option<PrivateKeyInfo>, LoadError> {
    let (public_key_spki, algorithm) = if let Ok(ec_key) = p256::SecretKey::from_sec1_der(der) {
        (p256_spki(&ec_key)?, KeyAlgorithm::EcP256)
    } else if let Ok(ec_key) = p384::SecretKey::from_sec1_der(der) {
        (p384_spki(&ec_key)?, KeyAlgorithm::EcP384)
    } else {
        return Ok(None);
    };

    Ok(Some(PrivateKeyInfo {
        public_key_spki,
        algorithm,
        der: PrivateKeyDer::Sec1(PrivateSec1KeyDer::from(der.to_vec())),
    }))
}

fn rsa_spki(key: &rsa::RsaPrivateKey) -> Result<Vec<u8>, LoadError> {
    use rsa::pkcs8::EncodePublicKey;

    let spki = rsa::RsaPublicKey::from(key)
        .to_public_key_der()
        .map_err(|e| LoadError::KeyParse {
            message: format!("Failed to encode RSA public key: {}", e),
        })?;
    Ok(spki.as_bytes().to_vec())
}

fn p256_spki(key: &p256::SecretKey) -> Result<Vec<u8>, LoadError> {
    use p256::pkcs8::EncodePublicKey;

    let spki = key
        .public_key()
        .to_public_key_der()
        .map_err(|e| LoadError::KeyParse {
            message: format!("Failed to encode EC P-256 public key: {}", e),
        })?;
    Ok(spki.as_bytes().to_vec())
}

fn p384_spki(key: &p384::SecretKey) -> Result<Vec<u8>, LoadError> {
    use p384::pkcs8::EncodePublicKey;

    let spki = key
        .public_key()
        .to_public_key_der()
        .map_err(|e| LoadError::KeyParse {
            message: format!("Failed to encode EC P-384 public key: {}", e),
        })?;
    Ok(spki.as_bytes().to_vec())
}

/// Check that a private key belongs to a certificate.
///
/// The key type must agree with the certificate's public key algorithm, and
/// the SubjectPublicKeyInfo derived from the key must equal the certificate's.
pub fn verify_key_matches(cert_der: &[u8], key_info: &PrivateKeyInfo) -> Result<(), LoadError> {
    let (rem, cert) = X509Certificate::from_der(cert_der).map_err(|e| LoadError::CertificateParse {
        message: format!("{:?}", e),
    })?;
    if !rem.is_empty() {
        return Err(LoadError::CertificateParse {
            message: format!("{} bytes of trailing data after certificate", rem.len()),
        });
    }

    let spki = cert.public_key();
    let cert_is_rsa = spki.algorithm.algorithm == OID_PKCS1_RSAENCRYPTION;
    let cert_is_ec = spki.algorithm.algorithm == OID_KEY_TYPE_EC_PUBLIC_KEY;

    let type_matches = if key_info.algorithm.is_rsa() {
        cert_is_rsa
    } else {
        cert_is_ec
    };
    if !type_matches {
        return Err(LoadError::KeyTypeMismatch);
    }

    if spki.raw != key_info.public_key_spki.as_slice() {
        return Err(LoadError::KeyMismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_not_a_key() {
        let err = parse_private_key(&[0x30, 0x03, 0x02, 0x01, 0x00]).unwrap_err();
        assert!(matches!(err, LoadError::KeyParse { .. }));
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(KeyAlgorithm::Rsa.to_string(), "RSA");
        assert_eq!(KeyAlgorithm::EcP384.to_string(), "EC P-384");
    }
}
