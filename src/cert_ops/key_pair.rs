//! TLS key pair loading
//!
//! Reads a certificate file and a private key file, removes pass-phrase
//! encryption from the key when present, and pairs the two after checking that
//! the key belongs to the leaf certificate.

use crate::cert_ops::blocks::pem_blocks;
use crate::cert_ops::collector::CERTIFICATE_TAG;
use crate::cert_ops::decrypt;
use crate::cert_ops::key_match::{self, KeyAlgorithm};
use crate::models::Certificate;
use crate::utils::{LoadError, Result};
use rustls::crypto::{ring, CryptoProvider};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::sign::CertifiedKey;
use rustls::{ClientConfig, RootCertStore, ServerConfig};
use std::path::Path;
use std::sync::Arc;
use zeroize::Zeroizing;

const PRIVATE_KEY_TAG: &str = "PRIVATE KEY";

/// A certificate chain with the private key of its leaf
#[derive(Debug)]
pub struct KeyPair {
    cert_chain: Vec<CertificateDer<'static>>,
    private_key: PrivateKeyDer<'static>,
    key_algorithm: KeyAlgorithm,
}

impl KeyPair {
    /// Pair PEM-encoded certificates with a PEM-encoded, unencrypted private key.
    ///
    /// Every `CERTIFICATE` block of `cert_pem` joins the chain, leaf first. The
    /// key is the first block of `key_pem` labelled `PRIVATE KEY` or ending in
    /// ` PRIVATE KEY`.
    pub fn from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self> {
        let mut cert_chain = Vec::new();
        let mut skipped = Vec::new();
        for block in pem_blocks(cert_pem) {
            if block.tag() == CERTIFICATE_TAG {
                cert_chain.push(CertificateDer::from(block.into_contents()));
            } else {
                skipped.push(block.tag().to_string());
            }
        }

        if cert_chain.is_empty() {
            return Err(match skipped.as_slice() {
                [tag] if is_private_key_tag(tag) => LoadError::CertificateInputHoldsKey,
                _ => LoadError::NoCertificatePemData,
            });
        }

        // Skipped labels decide which error an unusable key input reports
        let mut skipped = Vec::new();
        let mut key_block = None;
        for block in pem_blocks(key_pem) {
            if is_private_key_tag(block.tag()) {
                key_block = Some(block);
                break;
            }
            skipped.push(block.tag().to_string());
        }

        let key_block = match (key_block, skipped.as_slice()) {
            (Some(block), _) => block,
            (None, []) => return Err(LoadError::NoKeyPemData),
            (None, [tag]) if tag == CERTIFICATE_TAG => {
                return Err(LoadError::KeyInputHoldsCertificate)
            }
            (None, _) => return Err(LoadError::NoPrivateKeyBlock),
        };

        let key_der = Zeroizing::new(key_block.into_contents());
        let key_info = key_match::parse_private_key(&key_der)?;
        key_match::verify_key_matches(&cert_chain[0], &key_info)?;

        tracing::debug!(
            algorithm = %key_info.algorithm,
            chain_len = cert_chain.len(),
            "paired certificate with private key"
        );

        Ok(KeyPair {
            cert_chain,
            private_key: key_info.der,
            key_algorithm: key_info.algorithm,
        })
    }

    /// Certificate chain, leaf first
    pub fn cert_chain(&self) -> &[CertificateDer<'static>] {
        &self.cert_chain
    }

    pub fn private_key(&self) -> &PrivateKeyDer<'static> {
        &self.private_key
    }

    pub fn key_algorithm(&self) -> KeyAlgorithm {
        self.key_algorithm
    }

    /// Parse the leaf certificate
    pub fn leaf(&self) -> Result<Certificate> {
        // from_pem never builds an empty chain
        match self.cert_chain.first() {
            Some(der) => Certificate::from_der(der),
            None => Err(LoadError::NoCertificatePemData),
        }
    }

    pub fn into_parts(self) -> (Vec<CertificateDer<'static>>, PrivateKeyDer<'static>) {
        (self.cert_chain, self.private_key)
    }

    /// Build a rustls signing key for this pair using the ring provider
    pub fn certified_key(&self) -> Result<CertifiedKey> {
        let provider = ring::default_provider();
        let signing_key = provider
            .key_provider
            .load_private_key(self.private_key.clone_key())?;
        Ok(CertifiedKey::new(self.cert_chain.clone(), signing_key))
    }

    /// Server configuration presenting this pair, without client authentication
    pub fn server_config(&self) -> Result<ServerConfig> {
        let config = ServerConfig::builder_with_provider(provider())
            .with_safe_default_protocol_versions()?
            .with_no_client_auth()
            .with_single_cert(self.cert_chain.clone(), self.private_key.clone_key())?;
        Ok(config)
    }

    /// Client configuration trusting `roots` and presenting this pair to servers
    /// that ask for client authentication
    pub fn client_auth_config(&self, roots: RootCertStore) -> Result<ClientConfig> {
        let config = ClientConfig::builder_with_provider(provider())
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots)
            .with_client_auth_cert(self.cert_chain.clone(), self.private_key.clone_key())?;
        Ok(config)
    }
}

fn provider() -> Arc<CryptoProvider> {
    Arc::new(ring::default_provider())
}

fn is_private_key_tag(tag: &str) -> bool {
    tag == PRIVATE_KEY_TAG || tag.ends_with(" PRIVATE KEY")
}

/// Load a key pair from a certificate file and a private key file.
///
/// Both paths are trimmed of surrounding whitespace. `pass_phrase` is only used
/// when the key is encrypted; an empty pass-phrase with a plain key is fine.
pub fn load_key_pair(cert_path: &str, key_path: &str, pass_phrase: &str) -> Result<KeyPair> {
    let cert_path = Path::new(cert_path.trim());
    let key_path = Path::new(key_path.trim());

    let cert_pem = std::fs::read(cert_path).map_err(|e| LoadError::io(cert_path, e))?;
    let key_pem = Zeroizing::new(std::fs::read(key_path).map_err(|e| LoadError::io(key_path, e))?);

    tracing::debug!(
        cert = %cert_path.display(),
        key = %key_path.display(),
        "loading key pair"
    );

    let key_pem = decrypt_key_pem(&key_pem, pass_phrase.as_bytes())?;
    KeyPair::from_pem(&cert_pem, &key_pem)
}

/// Strip pass-phrase encryption from the first PEM block of a key file.
///
/// Plain keys are returned unchanged. Encrypted keys come back as a single,
/// freshly encoded plain PEM block.
pub fn decrypt_key_pem(key_pem: &[u8], pass_phrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let block = pem_blocks(key_pem).next().ok_or(LoadError::NoKeyPemData)?;

    let (tag, mut der) = if decrypt::is_encrypted_block(&block) {
        tracing::debug!(tag = block.tag(), "private key is PEM encrypted");
        (block.tag().to_string(), decrypt::decrypt_block(&block, pass_phrase)?)
    } else if decrypt::is_encrypted_pkcs8(&block) {
        tracing::debug!("private key is PKCS#8 encrypted");
        (
            PRIVATE_KEY_TAG.to_string(),
            decrypt::decrypt_pkcs8(&block, pass_phrase)?,
        )
    } else {
        return Ok(Zeroizing::new(key_pem.to_vec()));
    };

    let plain = ::pem::Pem::new(tag, std::mem::take(&mut *der));
    let encoded = Zeroizing::new(::pem::encode(&plain).into_bytes());
    // Scrub the plaintext DER once it is encoded
    drop(Zeroizing::new(plain.into_contents()));

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_key_tags() {
        assert!(is_private_key_tag("PRIVATE KEY"));
        assert!(is_private_key_tag("RSA PRIVATE KEY"));
        assert!(is_private_key_tag("EC PRIVATE KEY"));
        assert!(!is_private_key_tag("CERTIFICATE"));
        assert!(!is_private_key_tag("PUBLIC KEY"));
    }

    #[test]
    fn test_no_pem_in_key_file() {
        let err = decrypt_key_pem(b"not a key", b"").unwrap_err();
        assert!(matches!(err, LoadError::NoKeyPemData));
    }

    #[test]
    fn test_plain_key_passes_through() {
        let pem = ::pem::encode(&::pem::Pem::new("RSA PRIVATE KEY", vec![1, 2, 3]));
        let out = decrypt_key_pem(pem.as_bytes(), b"ignored").unwrap();
        assert_eq!(out.as_slice(), pem.as_bytes());
    }

    #[test]
    fn test_empty_certificate_input() {
        let key = ::pem::encode(&::pem::Pem::new("RSA PRIVATE KEY", vec![1, 2, 3]));
        let err = KeyPair::from_pem(b"", key.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::NoCertificatePemData));
    }

    #[test]
    fn test_switched_inputs() {
        let key = ::pem::encode(&::pem::Pem::new("RSA PRIVATE KEY", vec![1, 2, 3]));
        let err = KeyPair::from_pem(key.as_bytes(), key.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::CertificateInputHoldsKey));
    }

    #[test]
    fn test_certificate_in_key_input() {
        let cert = ::pem::encode(&::pem::Pem::new("CERTIFICATE", vec![1, 2, 3]));
        let err = KeyPair::from_pem(cert.as_bytes(), cert.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::KeyInputHoldsCertificate));
    }

    #[test]
    fn test_key_input_without_key_block() {
        let cert = ::pem::encode(&::pem::Pem::new("CERTIFICATE", vec![1, 2, 3]));
        let params = ::pem::encode(&::pem::Pem::new("EC PARAMETERS", vec![1, 2, 3]));
        let err = KeyPair::from_pem(cert.as_bytes(), params.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::NoPrivateKeyBlock));
    }

    #[test]
    fn test_certificate_beside_other_blocks_in_key_input() {
        let cert = ::pem::encode(&::pem::Pem::new("CERTIFICATE", vec![1, 2, 3]));
        let params = ::pem::encode(&::pem::Pem::new("EC PARAMETERS", vec![1, 2, 3]));
        let key_input = format!("{}{}", cert, params);
        let err = KeyPair::from_pem(cert.as_bytes(), key_input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::NoPrivateKeyBlock));
    }

    #[test]
    fn test_empty_key_input() {
        let cert = ::pem::encode(&::pem::Pem::new("CERTIFICATE", vec![1, 2, 3]));
        let err = KeyPair::from_pem(cert.as_bytes(), b"no pem here").unwrap_err();
        assert!(matches!(err, LoadError::NoKeyPemData));
    }

    #[test]
    fn test_key_beside_other_blocks_in_certificate_input() {
        let key = ::pem::encode(&::pem::Pem::new("RSA PRIVATE KEY", vec![1, 2, 3]));
        let params = ::pem::encode(&::pem::Pem::new("EC PARAMETERS", vec![1, 2, 3]));
        let cert_input = format!("{}{}", params, key);
        let err = KeyPair::from_pem(cert_input.as_bytes(), key.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::NoCertificatePemData));
    }

    #[test]
    fn test_encrypted_key_is_reframed_without_headers() {
        let encrypted = include_str!("../../tests/fixtures/test_rsa");
        let plain = include_str!("../../tests/fixtures/test_rsa_plain.pem");

        let out = decrypt_key_pem(encrypted.as_bytes(), b"testing").unwrap();
        let blocks: Vec<_> = pem_blocks(&out).collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].tag(), "RSA PRIVATE KEY");
        assert!(blocks[0].headers().get("DEK-Info").is_none());
        assert_eq!(
            blocks[0].contents(),
            ::pem::parse(plain).unwrap().contents()
        );
    }
}
