#![forbid(unsafe_code)]

//! Crypto collaborator traits.
//!
//! The object model does not implement any cryptography. Hosts inject an
//! implementation of these traits (an xmlsec binding, a RustCrypto-based
//! backend, a test fake); the adapters only decide *what* gets signed,
//! verified, encrypted or decrypted, and over which bytes.

use sigtuna_core::Result;

/// Signing and verification over canonical bytes.
pub trait SignatureBackend {
    /// Sign `data` with `key` using the algorithm named by its URI.
    fn sign(&self, data: &[u8], key: &[u8], algorithm: &str) -> Result<Vec<u8>>;

    /// Verify `signature` over `data`. A cryptographic mismatch is
    /// `Ok(false)`, never an error.
    fn verify(&self, data: &[u8], signature: &[u8], key: &[u8], algorithm: &str) -> Result<bool>;
}

/// Encryption and decryption of raw bytes.
pub trait EncryptionBackend {
    fn encrypt(&self, data: &[u8], key: &[u8], algorithm: &str) -> Result<Vec<u8>>;
    fn decrypt(&self, data: &[u8], key: &[u8], algorithm: &str) -> Result<Vec<u8>>;
}
