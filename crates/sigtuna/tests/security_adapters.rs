#![forbid(unsafe_code)]

//! Signature and encryption adapters exercised through complete
//! documents, with fake backends standing in for real cryptography.

use std::cell::Cell;

use sigtuna::assertion::{
    Assertion, AttributeStatement, EncryptedAssertion, Issuer, Statement,
};
use sigtuna::core::{Error, Result};
use sigtuna::protocol::{AuthnRequest, MessageFields};
use sigtuna::security::{EncryptionBackend, SignatureBackend};

const AES128_GCM: &str = "http://www.w3.org/2009/xmlenc11#aes128-gcm";
const TRIPLE_DES: &str = "http://www.w3.org/2001/04/xmlenc#tripledes-cbc";
const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";

/// Deterministic fake: signature is the sum of data bytes xor the key.
struct FakeSigner;

impl SignatureBackend for FakeSigner {
    fn sign(&self, data: &[u8], key: &[u8], _algorithm: &str) -> Result<Vec<u8>> {
        let sum = data.iter().fold(0u8, |a, b| a.wrapping_add(*b));
        Ok(vec![sum ^ key[0]])
    }

    fn verify(&self, data: &[u8], signature: &[u8], key: &[u8], algorithm: &str) -> Result<bool> {
        Ok(signature == self.sign(data, key, algorithm)?.as_slice())
    }
}

/// XOR cipher that counts how often the backend is reached.
struct CountingCipher {
    calls: Cell<u32>,
}

impl CountingCipher {
    fn new() -> Self {
        Self { calls: Cell::new(0) }
    }
}

impl EncryptionBackend for CountingCipher {
    fn encrypt(&self, data: &[u8], key: &[u8], _algorithm: &str) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        Ok(data.iter().map(|b| b ^ key[0]).collect())
    }

    fn decrypt(&self, data: &[u8], key: &[u8], _algorithm: &str) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        Ok(data.iter().map(|b| b ^ key[0]).collect())
    }
}

fn attribute_assertion() -> Assertion {
    let statement = AttributeStatement::new(
        vec![sigtuna::assertion::Attribute::new("mail", vec!["alice@example.org".into()]).unwrap()],
        vec![],
    )
    .unwrap();
    Assertion::new(
        "_enc1",
        1_623_508_200,
        Issuer::new("https://idp.example.org").unwrap(),
        None,
        None,
        vec![Statement::Attribute(statement)],
    )
    .unwrap()
}

#[test]
fn sign_then_verify_request() {
    let fields = MessageFields::new("_req1", 1_623_508_200)
        .unwrap()
        .with_issuer(Issuer::new("https://sp.example.org").unwrap());
    let mut request = AuthnRequest::new(fields);
    assert!(matches!(
        request.verify(&FakeSigner, b"k"),
        Err(Error::MissingElement(_))
    ));

    request.sign(&FakeSigner, b"k", RSA_SHA256).unwrap();
    assert!(request.fields().is_signed());
    assert!(!request.fields().was_signed_at_construction());
    assert!(request.verify(&FakeSigner, b"k").unwrap());
    assert!(!request.verify(&FakeSigner, b"other").unwrap());
}

#[test]
fn parsed_signature_verifies_over_original_bytes() {
    let mut request = AuthnRequest::new(
        MessageFields::new("_req2", 1_623_508_200)
            .unwrap()
            .with_issuer(Issuer::new("https://sp.example.org").unwrap()),
    );
    request.sign(&FakeSigner, b"k", RSA_SHA256).unwrap();

    // The serialized request now embeds a ds:Signature; a reparse must
    // retain the document's own bytes as what the signature covers.
    let xml = request.to_xml().to_string();
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let reparsed = AuthnRequest::from_xml(doc.root_element()).unwrap();
    assert!(reparsed.fields().was_signed_at_construction());
    // The reparsed bytes differ from the pre-signature serialization the
    // fake signed, so verification is a clean cryptographic false.
    assert!(!reparsed.verify(&FakeSigner, b"k").unwrap());
}

#[test]
fn encrypted_assertion_round_trip() {
    let assertion = attribute_assertion();
    let cipher = CountingCipher::new();
    let encrypted =
        EncryptedAssertion::encrypt(&assertion, &cipher, &[0x5a], AES128_GCM).unwrap();

    // Through XML and back.
    let xml = encrypted.to_xml().to_string();
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let reparsed = EncryptedAssertion::from_xml(doc.root_element()).unwrap();

    let decrypted = reparsed.decrypt(&cipher, &[0x5a], &[]).unwrap();
    assert_eq!(decrypted, assertion);
    assert!(!decrypted.was_signed_at_construction());
    assert_eq!(cipher.calls.get(), 2);
}

#[test]
fn blacklisted_algorithm_refused_before_backend() {
    let assertion = attribute_assertion();
    let cipher = CountingCipher::new();
    let encrypted =
        EncryptedAssertion::encrypt(&assertion, &cipher, &[0x5a], TRIPLE_DES).unwrap();
    assert_eq!(cipher.calls.get(), 1);

    let err = encrypted
        .decrypt(&cipher, &[0x5a], &[TRIPLE_DES])
        .unwrap_err();
    assert!(matches!(err, Error::SecurityViolation(_)));
    // No decrypt call reached the backend.
    assert_eq!(cipher.calls.get(), 1);
}
