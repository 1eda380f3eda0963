#![forbid(unsafe_code)]

//! Signed and encrypted element support for the Sigtuna SAML 2.0 library.
//!
//! Cryptography itself is a collaborator: hosts inject a
//! [`SignatureBackend`] / [`EncryptionBackend`]. This crate owns the
//! *bindings* — which bytes a signature covers, how an EncryptedData
//! envelope is shaped, when a blacklisted algorithm must be refused.

pub mod backend;
pub mod encrypted;
pub mod signed;

pub use backend::{EncryptionBackend, SignatureBackend};
pub use encrypted::EncryptedData;
pub use signed::{SignatureRecord, Signing};
