//! Data models for loaded certificates

pub mod certificate;

pub use certificate::Certificate;
