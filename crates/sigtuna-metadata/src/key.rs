#![forbid(unsafe_code)]

//! md:KeyDescriptor and md:EncryptionMethod.

use sigtuna_core::{ns, Error, Result};
use sigtuna_xml::{accessor, Chunk, Element};

/// The `use` attribute of a KeyDescriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUse {
    Signing,
    Encryption,
}

impl KeyUse {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signing => "signing",
            Self::Encryption => "encryption",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "signing" => Ok(Self::Signing),
            "encryption" => Ok(Self::Encryption),
            other => Err(Error::SchemaViolation(format!(
                "'{other}' is not a KeyDescriptor use value"
            ))),
        }
    }
}

/// The md:EncryptionMethod element advertised alongside an encryption key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionMethod {
    algorithm: String,
}

impl EncryptionMethod {
    pub fn new(algorithm: &str) -> Result<Self> {
        Ok(Self {
            algorithm: accessor::valid_uri(algorithm, "EncryptionMethod Algorithm")?,
        })
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MD, "EncryptionMethod")?;
        Self::new(accessor::required_attribute(node, ns::attr::ALGORITHM)?)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MD, ns::MD, "EncryptionMethod");
        e.set_attr(ns::attr::ALGORITHM, &self.algorithm);
        e
    }
}

/// The md:KeyDescriptor element. The ds:KeyInfo payload stays a verbatim
/// chunk; interpreting certificates is the consumer's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    key_use: Option<KeyUse>,
    key_info: Chunk,
    encryption_methods: Vec<EncryptionMethod>,
}

impl KeyDescriptor {
    pub fn new(key_info: Chunk) -> Self {
        Self {
            key_use: None,
            key_info,
            encryption_methods: Vec::new(),
        }
    }

    pub fn with_use(mut self, key_use: KeyUse) -> Self {
        self.key_use = Some(key_use);
        self
    }

    pub fn with_encryption_method(mut self, method: EncryptionMethod) -> Self {
        self.encryption_methods.push(method);
        self
    }

    pub fn key_use(&self) -> Option<KeyUse> {
        self.key_use
    }

    pub fn key_info(&self) -> &Chunk {
        &self.key_info
    }

    pub fn encryption_methods(&self) -> &[EncryptionMethod] {
        &self.encryption_methods
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MD, "KeyDescriptor")?;

        let key_use = accessor::optional_attribute(node, "use")
            .map(KeyUse::parse)
            .transpose()?;

        let key_info = accessor::exactly_one(
            accessor::children(node, ns::DSIG, "KeyInfo"),
            "md:KeyDescriptor",
            "ds:KeyInfo",
        )
        .map(Chunk::from_node)?;

        let encryption_methods = accessor::children(node, ns::MD, "EncryptionMethod")
            .into_iter()
            .map(EncryptionMethod::from_xml)
            .collect::<Result<_>>()?;

        Ok(Self {
            key_use,
            key_info,
            encryption_methods,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MD, ns::MD, "KeyDescriptor");
        e.set_attr_opt("use", self.key_use.map(KeyUse::as_str));
        self.key_info.write_into(&mut e);
        for method in &self.encryption_methods {
            e.push(method.to_xml());
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_DESCRIPTOR: &str = concat!(
        r#"<md:KeyDescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" "#,
        r#"xmlns:ds="http://www.w3.org/2000/09/xmldsig#" use="encryption">"#,
        r#"<ds:KeyInfo><ds:KeyName>idp-key-1</ds:KeyName></ds:KeyInfo>"#,
        r#"<md:EncryptionMethod Algorithm="http://www.w3.org/2009/xmlenc11#aes128-gcm"/>"#,
        r#"</md:KeyDescriptor>"#
    );

    #[test]
    fn test_parse_preserves_key_info_verbatim() {
        let doc = roxmltree::Document::parse(KEY_DESCRIPTOR).unwrap();
        let kd = KeyDescriptor::from_xml(doc.root_element()).unwrap();
        assert_eq!(kd.key_use(), Some(KeyUse::Encryption));
        assert_eq!(
            kd.key_info().raw(),
            r#"<ds:KeyInfo><ds:KeyName>idp-key-1</ds:KeyName></ds:KeyInfo>"#
        );
        assert_eq!(kd.encryption_methods().len(), 1);
    }

    #[test]
    fn test_bad_use_rejected() {
        assert!(KeyUse::parse("both").is_err());
    }

    #[test]
    fn test_key_info_required() {
        let xml = r#"<md:KeyDescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata"/>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            KeyDescriptor::from_xml(doc.root_element()),
            Err(sigtuna_core::Error::MissingElement(_))
        ));
    }
}
