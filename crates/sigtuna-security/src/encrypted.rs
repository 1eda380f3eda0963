#![forbid(unsafe_code)]

//! The xenc:EncryptedData envelope and the encrypt/decrypt adapter.
//!
//! EncryptedAssertion, EncryptedID and EncryptedAttribute all wrap the
//! same envelope: an EncryptionMethod algorithm URI plus base64 cipher
//! data. Decryption goes through an injected [`EncryptionBackend`]; the
//! typed wrappers re-parse the plaintext through their element's normal
//! `from_xml`.

use crate::backend::EncryptionBackend;
use base64::Engine;
use sigtuna_core::{ns, Error, Result};
use sigtuna_xml::{accessor, Element};

/// An xenc:EncryptedData element: algorithm identifiers and ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    id: Option<String>,
    data_type: Option<String>,
    algorithm: String,
    cipher_value: Vec<u8>,
}

impl EncryptedData {
    /// Assemble an envelope from already-encrypted bytes.
    pub fn new(algorithm: &str, cipher_value: Vec<u8>) -> Result<Self> {
        Ok(Self {
            id: None,
            data_type: None,
            algorithm: accessor::valid_uri(algorithm, "xenc:EncryptionMethod Algorithm")?,
            cipher_value,
        })
    }

    pub fn with_type(mut self, data_type: &str) -> Self {
        self.data_type = Some(data_type.to_owned());
        self
    }

    /// The algorithm URI declared by the envelope.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn cipher_value(&self) -> &[u8] {
        &self.cipher_value
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::XENC, "EncryptedData")?;

        let method = accessor::exactly_one(
            accessor::children(node, ns::XENC, "EncryptionMethod"),
            "xenc:EncryptedData",
            "xenc:EncryptionMethod",
        )?;
        let algorithm =
            accessor::required_attribute(method, ns::attr::ALGORITHM)?.to_owned();

        let cipher_data = accessor::exactly_one(
            accessor::children(node, ns::XENC, "CipherData"),
            "xenc:EncryptedData",
            "xenc:CipherData",
        )?;
        let cipher_value = accessor::exactly_one(
            accessor::children(cipher_data, ns::XENC, "CipherValue"),
            "xenc:CipherData",
            "xenc:CipherValue",
        )?;
        let b64: String = accessor::text_content(cipher_value)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let cipher_value = base64::engine::general_purpose::STANDARD
            .decode(&b64)
            .map_err(|e| Error::Base64(format!("xenc:CipherValue: {e}")))?;

        Ok(Self {
            id: accessor::optional_attribute(node, "Id").map(str::to_owned),
            data_type: accessor::optional_attribute(node, "Type").map(str::to_owned),
            algorithm,
            cipher_value,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::XENC, ns::XENC, "EncryptedData");
        e.set_attr_opt("Id", self.id.as_deref());
        e.set_attr_opt("Type", self.data_type.as_deref());

        let mut method = Element::new(ns::prefix::XENC, ns::XENC, "EncryptionMethod");
        method.set_attr(ns::attr::ALGORITHM, &self.algorithm);
        e.push(method);

        let mut cipher_data = Element::new(ns::prefix::XENC, ns::XENC, "CipherData");
        let mut cipher_value = Element::new(ns::prefix::XENC, ns::XENC, "CipherValue");
        cipher_value.push_text(
            &base64::engine::general_purpose::STANDARD.encode(&self.cipher_value),
        );
        cipher_data.push(cipher_value);
        e.push(cipher_data);
        e
    }

    /// Decrypt the payload.
    ///
    /// When the envelope declares an algorithm on the caller's blacklist
    /// the decryption is refused with `SecurityViolation` before the
    /// backend is consulted — downgrade attacks to broken ciphers must
    /// not reach the crypto layer at all.
    pub fn decrypt(
        &self,
        backend: &dyn EncryptionBackend,
        key: &[u8],
        blacklist: &[&str],
    ) -> Result<Vec<u8>> {
        if blacklist.contains(&self.algorithm.as_str()) {
            return Err(Error::SecurityViolation(format!(
                "refusing to decrypt with blacklisted algorithm {}",
                self.algorithm
            )));
        }
        backend.decrypt(&self.cipher_value, key, &self.algorithm)
    }

    /// Encrypt plaintext bytes into a fresh envelope, recording the
    /// algorithm identifier needed to decrypt it later.
    pub fn encrypt(
        plaintext: &[u8],
        backend: &dyn EncryptionBackend,
        key: &[u8],
        algorithm: &str,
    ) -> Result<Self> {
        let cipher_value = backend.encrypt(plaintext, key, algorithm)?;
        Self::new(algorithm, cipher_value)
    }
}
