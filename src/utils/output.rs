//! Terminal output helpers for the command-line tool

use crate::cert_ops::KeyPair;
use crate::models::Certificate;
use console::style;
use serde::Serialize;

/// Print a pass status
pub fn print_pass(message: &str) {
    println!("  {} {}", style("✓").green(), message);
}

/// Print a warning status
pub fn print_warning(message: &str) {
    println!("  {} {}", style("⚠").yellow(), message);
}

/// Print an info status
pub fn print_info(message: &str) {
    println!("  {} {}", style("ℹ").cyan(), message);
}

/// Print one certificate as an indented block
pub fn print_certificate(index: usize, cert: &Certificate) {
    let label = cert
        .subject_common_name
        .as_deref()
        .unwrap_or(cert.subject.as_str());
    println!("{} {}", style(format!("[{}]", index)).dim(), style(label).bold());
    println!("    Subject:     {}", cert.subject);
    println!("    Issuer:      {}", cert.issuer);
    println!("    Serial:      {}", cert.serial);
    println!("    Not Before:  {}", cert.not_before.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("    Not After:   {}", cert.not_after.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("    SHA-256:     {}", cert.fingerprint);

    if !cert.is_time_valid() {
        print_warning("Certificate is outside its validity period");
    }
}

/// Print a collection of certificates
pub fn print_certificates(path: &str, certs: &[Certificate]) {
    println!(
        "{} {} certificate{} under {}",
        style("Found").cyan().bold(),
        certs.len(),
        if certs.len() == 1 { "" } else { "s" },
        path.trim()
    );
    for (i, cert) in certs.iter().enumerate() {
        print_certificate(i, cert);
    }
}

/// Summary of a loaded key pair, used for JSON output
#[derive(Debug, Serialize)]
pub struct KeyPairSummary {
    pub key_algorithm: String,
    pub chain_length: usize,
    pub leaf: Certificate,
}

impl KeyPairSummary {
    pub fn new(pair: &KeyPair, leaf: Certificate) -> Self {
        Self {
            key_algorithm: pair.key_algorithm().to_string(),
            chain_length: pair.cert_chain().len(),
            leaf,
        }
    }
}

/// Print a loaded key pair
pub fn print_key_pair(summary: &KeyPairSummary) {
    print_pass("Private key matches certificate");
    print_info(&format!("Key algorithm: {}", summary.key_algorithm));
    print_info(&format!("Chain length: {}", summary.chain_length));
    print_certificate(0, &summary.leaf);
}
