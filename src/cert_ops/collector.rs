//! Trusted certificate collection
//!
//! Walks a file or directory tree and gathers every `CERTIFICATE` PEM block it
//! finds, for example to build a trust store.

use crate::cert_ops::blocks::pem_blocks;
use crate::models::Certificate;
use crate::utils::{LoadError, Result};
use rustls::RootCertStore;
use std::path::Path;
use walkdir::WalkDir;

/// PEM label of an X.509 certificate
pub const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Collect all certificates found under `path`.
///
/// `path` is trimmed of surrounding whitespace and may name a single file or a
/// directory. Directories are walked depth-first in file name order, so the
/// result is ordered by file and then by block position within the file.
/// Blocks with any other label are ignored.
///
/// The first unreadable entry or malformed certificate aborts the whole walk;
/// no partial list is ever returned.
pub fn collect_certificates(path: &str) -> Result<Vec<Certificate>> {
    let root = Path::new(path.trim());
    let mut certs = Vec::new();

    tracing::debug!(path = %root.display(), "collecting certificates");

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            LoadError::io(path, e.into())
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let found = read_certificates(entry.path())?;
        tracing::trace!(file = %entry.path().display(), count = found.len(), "read certificate file");
        certs.extend(found);
    }

    tracing::debug!(path = %root.display(), count = certs.len(), "collected certificates");

    Ok(certs)
}

/// Read every certificate from a single PEM file
pub fn read_certificates(path: &Path) -> Result<Vec<Certificate>> {
    let data = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
    parse_certificates(&data)
}

/// Parse every `CERTIFICATE` block in a PEM buffer
pub fn parse_certificates(data: &[u8]) -> Result<Vec<Certificate>> {
    pem_blocks(data)
        .filter(|block| block.tag() == CERTIFICATE_TAG)
        .map(|block| Certificate::from_der(block.contents()))
        .collect()
}

/// Build a rustls trust store from collected certificates
pub fn root_store(certs: &[Certificate]) -> Result<RootCertStore> {
    let mut store = RootCertStore::empty();
    for cert in certs {
        store.add(cert.der().clone())?;
    }
    Ok(store)
}
