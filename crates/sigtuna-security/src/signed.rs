#![forbid(unsafe_code)]

//! Signature binding for signable elements.
//!
//! A signed element carries a [`Signing`] value holding the signature
//! record and whether the signature was already present when the element
//! was parsed. Verification always runs over the retained original bytes
//! of the parsed element, never over a fresh serialization: whitespace
//! and attribute order are not preserved by re-serialization, so the
//! recomputed canonical form would not match what was signed.

use crate::backend::SignatureBackend;
use base64::Engine;
use sigtuna_core::{ns, Error, Result};
use sigtuna_xml::{accessor, Chunk, Element};

/// One attached signature: the algorithm it claims, its decoded value,
/// the verbatim ds:Signature subtree for re-emission, and the byte form
/// the signature covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRecord {
    algorithm: String,
    value: Vec<u8>,
    /// The verbatim ds:Signature element, when it came from a parse.
    chunk: Option<Chunk>,
    /// The bytes the signature covers: the original parsed span, or the
    /// serialization cached at `sign` time.
    signed_bytes: Option<Vec<u8>>,
}

impl SignatureRecord {
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// Signature state of a signable element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signing {
    signature: Option<SignatureRecord>,
    signed_at_construction: bool,
}

impl Signing {
    /// State for an element built programmatically: unsigned.
    pub fn unsigned() -> Self {
        Self::default()
    }

    /// Parse the optional ds:Signature child of `node` (at most one) and,
    /// when present, retain the node's original byte span for later
    /// verification.
    pub fn from_parsed(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        let sigs = accessor::children(node, ns::DSIG, "Signature");
        let parent = node.tag_name().name().to_owned();
        let sig = accessor::at_most_one(sigs, &parent, "ds:Signature")?;

        let Some(sig_node) = sig else {
            return Ok(Self::unsigned());
        };

        let algorithm = read_signature_method(sig_node)?;
        let value = read_signature_value(sig_node)?;
        let original = &node.document().input_text()[node.range()];

        Ok(Self {
            signature: Some(SignatureRecord {
                algorithm,
                value,
                chunk: Some(Chunk::from_node(sig_node)),
                signed_bytes: Some(original.as_bytes().to_vec()),
            }),
            signed_at_construction: true,
        })
    }

    /// Whether the element came from bytes that already carried a
    /// signature. Distinct from having been signed programmatically
    /// after construction; callers deciding trust must not conflate the
    /// two.
    pub fn was_signed_at_construction(&self) -> bool {
        self.signed_at_construction
    }

    /// Whether any signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn signature(&self) -> Option<&SignatureRecord> {
        self.signature.as_ref()
    }

    /// One-shot signing: sign `canonical_bytes` (the element's current
    /// serialization, computed by the caller) and cache that byte form as
    /// what the signature covers.
    pub fn sign(
        &mut self,
        backend: &dyn SignatureBackend,
        key: &[u8],
        algorithm: &str,
        canonical_bytes: Vec<u8>,
    ) -> Result<()> {
        let value = backend.sign(&canonical_bytes, key, algorithm)?;
        self.signature = Some(SignatureRecord {
            algorithm: algorithm.to_owned(),
            value,
            chunk: None,
            signed_bytes: Some(canonical_bytes),
        });
        Ok(())
    }

    /// Verify the attached signature over the retained byte form.
    ///
    /// Returns `Ok(false)` on cryptographic mismatch. Fails with
    /// `MissingElement` when no signature is attached at all, and with
    /// `ProtocolViolation` when a signature exists but no byte form was
    /// retained to verify it against.
    pub fn verify(&self, backend: &dyn SignatureBackend, key: &[u8]) -> Result<bool> {
        let record = self.signature.as_ref().ok_or_else(|| {
            Error::MissingElement("no ds:Signature attached, nothing to verify".into())
        })?;
        let bytes = record.signed_bytes.as_ref().ok_or_else(|| {
            Error::ProtocolViolation(
                "signature present but the signed byte form was not retained".into(),
            )
        })?;
        backend.verify(bytes, &record.value, key, &record.algorithm)
    }

    /// Emit the signature into the serialized element, in the position
    /// the caller's content model dictates. A parsed signature re-emits
    /// its verbatim subtree; a programmatic one is written fresh.
    pub fn write_into(&self, parent: &mut Element) {
        let Some(record) = &self.signature else {
            return;
        };
        if let Some(chunk) = &record.chunk {
            chunk.write_into(parent);
            return;
        }

        let b64 = base64::engine::general_purpose::STANDARD.encode(&record.value);
        let mut sig = Element::new(ns::prefix::DSIG, ns::DSIG, "Signature");
        let mut signed_info = Element::new(ns::prefix::DSIG, ns::DSIG, "SignedInfo");
        let mut method = Element::new(ns::prefix::DSIG, ns::DSIG, "SignatureMethod");
        method.set_attr(ns::attr::ALGORITHM, &record.algorithm);
        signed_info.push(method);
        sig.push(signed_info);
        let mut value = Element::new(ns::prefix::DSIG, ns::DSIG, "SignatureValue");
        value.push_text(&b64);
        sig.push(value);
        parent.push(sig);
    }
}

fn read_signature_method(sig_node: roxmltree::Node<'_, '_>) -> Result<String> {
    let signed_info = accessor::exactly_one(
        accessor::children(sig_node, ns::DSIG, "SignedInfo"),
        "ds:Signature",
        "ds:SignedInfo",
    )?;
    let method = accessor::exactly_one(
        accessor::children(signed_info, ns::DSIG, "SignatureMethod"),
        "ds:SignedInfo",
        "ds:SignatureMethod",
    )?;
    Ok(accessor::required_attribute(method, ns::attr::ALGORITHM)?.to_owned())
}

fn read_signature_value(sig_node: roxmltree::Node<'_, '_>) -> Result<Vec<u8>> {
    let value_node = accessor::exactly_one(
        accessor::children(sig_node, ns::DSIG, "SignatureValue"),
        "ds:Signature",
        "ds:SignatureValue",
    )?;
    let b64: String = accessor::text_content(value_node)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(&b64)
        .map_err(|e| Error::Base64(format!("ds:SignatureValue: {e}")))
}
