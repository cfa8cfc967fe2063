//! Certificate information types

use crate::utils::LoadError;
use chrono::{DateTime, TimeZone, Utc};
use rustls::pki_types::CertificateDer;
use serde::Serialize;
use sha2::Digest;
use x509_parser::prelude::*;

/// A parsed X.509 certificate that owns its DER encoding
#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    /// Full subject distinguished name
    pub subject: String,
    /// Full issuer distinguished name
    pub issuer: String,
    pub subject_common_name: Option<String>,
    pub issuer_common_name: Option<String>,
    /// Serial number (hex string)
    pub serial: String,
    /// SHA-256 fingerprint of the DER encoding
    pub fingerprint: String,
    /// Not valid before
    pub not_before: DateTime<Utc>,
    /// Not valid after
    pub not_after: DateTime<Utc>,
    /// Public key algorithm OID
    pub public_key_algorithm: String,
    /// Raw SubjectPublicKeyInfo
    #[serde(skip)]
    pub public_key_spki: Vec<u8>,
    pub is_self_signed: bool,
    pub is_ca: bool,
    #[serde(skip)]
    der: CertificateDer<'static>,
}

impl Certificate {
    /// Parse a single DER-encoded certificate
    pub fn from_der(der: &[u8]) -> Result<Self, LoadError> {
        let (rem, cert) = X509Certificate::from_der(der).map_err(|e| LoadError::CertificateParse {
            message: format!("{:?}", e),
        })?;
        if !rem.is_empty() {
            return Err(LoadError::CertificateParse {
                message: format!("{} bytes of trailing data after certificate", rem.len()),
            });
        }

        let is_ca = cert
            .basic_constraints()
            .map(|bc| bc.map(|ext| ext.value.ca).unwrap_or(false))
            .unwrap_or(false);

        Ok(Certificate {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            subject_common_name: common_name(cert.subject()),
            issuer_common_name: common_name(cert.issuer()),
            serial: cert.raw_serial_as_string(),
            fingerprint: fingerprint(der),
            not_before: asn1_time_to_datetime(cert.validity().not_before)?,
            not_after: asn1_time_to_datetime(cert.validity().not_after)?,
            public_key_algorithm: cert.public_key().algorithm.algorithm.to_id_string(),
            public_key_spki: cert.public_key().raw.to_vec(),
            is_self_signed: cert.subject() == cert.issuer(),
            is_ca,
            der: CertificateDer::from(der.to_vec()),
        })
    }

    /// The DER encoding this certificate was parsed from
    pub fn der(&self) -> &CertificateDer<'static> {
        &self.der
    }

    /// Check whether the certificate is currently within its validity period
    pub fn is_time_valid(&self) -> bool {
        let now = Utc::now();
        now >= self.not_before && now <= self.not_after
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for Certificate {}

fn common_name(name: &X509Name<'_>) -> Option<String> {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string)
}

fn fingerprint(der: &[u8]) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(der);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Convert ASN.1 time to chrono DateTime
fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, LoadError> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .ok_or_else(|| LoadError::CertificateParse {
            message: "Invalid timestamp in certificate".to_string(),
        })
}
