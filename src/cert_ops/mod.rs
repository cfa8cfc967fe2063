//! Certificate and key file operations
//!
//! Provides PEM block scanning, trusted certificate collection, pass-phrase
//! decryption of private keys, and certificate/key pairing.

pub mod blocks;
pub mod collector;
pub mod decrypt;
pub mod key_match;
pub mod key_pair;

pub use blocks::{pem_blocks, PemBlocks};
pub use collector::{collect_certificates, parse_certificates, read_certificates, root_store};
pub use key_match::KeyAlgorithm;
pub use key_pair::{decrypt_key_pem, load_key_pair, KeyPair};
