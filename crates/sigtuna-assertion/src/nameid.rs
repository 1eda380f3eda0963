#![forbid(unsafe_code)]

//! Identity-naming elements: NameID, BaseID, EncryptedID and the
//! identifier choice shared by Subject and SubjectConfirmation.

use sigtuna_core::{ns, Error, Result};
use sigtuna_security::{EncryptedData, EncryptionBackend};
use sigtuna_xml::{accessor, Chunk, Element};

/// The attribute/content set of the schema's NameIDType, shared by
/// saml:NameID and saml:Issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIdType {
    pub value: String,
    pub name_qualifier: Option<String>,
    pub sp_name_qualifier: Option<String>,
    pub format: Option<String>,
    pub sp_provided_id: Option<String>,
}

impl NameIdType {
    pub fn new(value: &str) -> Result<Self> {
        Ok(Self {
            value: accessor::non_empty(value, "NameIDType content")?,
            name_qualifier: None,
            sp_name_qualifier: None,
            format: None,
            sp_provided_id: None,
        })
    }

    pub fn with_format(mut self, format: &str) -> Result<Self> {
        self.format = Some(accessor::valid_uri(format, "NameIDType Format")?);
        Ok(self)
    }

    pub(crate) fn parse(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        let format = match accessor::optional_attribute(node, "Format") {
            Some(f) => Some(accessor::valid_uri(f, "NameIDType Format")?),
            None => None,
        };
        Ok(Self {
            value: accessor::non_empty(&accessor::text_content(node), "NameIDType content")?,
            name_qualifier: accessor::optional_attribute(node, "NameQualifier")
                .map(str::to_owned),
            sp_name_qualifier: accessor::optional_attribute(node, "SPNameQualifier")
                .map(str::to_owned),
            format,
            sp_provided_id: accessor::optional_attribute(node, "SPProvidedID")
                .map(str::to_owned),
        })
    }

    pub(crate) fn write(&self, e: &mut Element) {
        e.set_attr_opt("NameQualifier", self.name_qualifier.as_deref());
        e.set_attr_opt("SPNameQualifier", self.sp_name_qualifier.as_deref());
        e.set_attr_opt("Format", self.format.as_deref());
        e.set_attr_opt("SPProvidedID", self.sp_provided_id.as_deref());
        e.push_text(&self.value);
    }
}

/// The saml:NameID element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameId(pub NameIdType);

impl NameId {
    pub fn new(value: &str) -> Result<Self> {
        Ok(Self(NameIdType::new(value)?))
    }

    pub fn value(&self) -> &str {
        &self.0.value
    }

    pub fn format(&self) -> Option<&str> {
        self.0.format.as_deref()
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "NameID")?;
        Ok(Self(NameIdType::parse(node)?))
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "NameID");
        self.0.write(&mut e);
        e
    }
}

/// The abstract saml:BaseID element.
///
/// BaseID is only ever concrete through `xsi:type` substitution; without
/// a registered meaning for the subtype the subtree is preserved
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseId {
    chunk: Chunk,
}

impl BaseId {
    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "BaseID")?;
        Ok(Self {
            chunk: Chunk::from_node(node),
        })
    }

    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }
}

/// The saml:EncryptedID element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedId {
    data: EncryptedData,
}

impl EncryptedId {
    pub fn new(data: EncryptedData) -> Self {
        Self { data }
    }

    pub fn encrypted_data(&self) -> &EncryptedData {
        &self.data
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "EncryptedID")?;
        let data = accessor::exactly_one(
            accessor::children(node, ns::XENC, "EncryptedData"),
            "saml:EncryptedID",
            "xenc:EncryptedData",
        )?;
        Ok(Self {
            data: EncryptedData::from_xml(data)?,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "EncryptedID");
        e.push(self.data.to_xml());
        e
    }

    /// Decrypt into the NameID the ciphertext represents.
    pub fn decrypt(
        &self,
        backend: &dyn EncryptionBackend,
        key: &[u8],
        blacklist: &[&str],
    ) -> Result<NameId> {
        let plaintext = self.data.decrypt(backend, key, blacklist)?;
        let text = String::from_utf8(plaintext)
            .map_err(|e| Error::XmlParse(format!("decrypted NameID is not UTF-8: {e}")))?;
        let doc = roxmltree::Document::parse(&text)
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        NameId::from_xml(doc.root_element())
    }

    /// Encrypt a NameID into a fresh EncryptedID.
    pub fn encrypt(
        name_id: &NameId,
        backend: &dyn EncryptionBackend,
        key: &[u8],
        algorithm: &str,
    ) -> Result<Self> {
        let plaintext = name_id.to_xml().to_bytes();
        Ok(Self {
            data: EncryptedData::encrypt(&plaintext, backend, key, algorithm)?,
        })
    }
}

/// The identifier choice carried by Subject and SubjectConfirmation:
/// exactly one of BaseID, NameID or EncryptedID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    BaseId(BaseId),
    NameId(NameId),
    EncryptedId(EncryptedId),
}

impl Identifier {
    /// Collect the identifier children of `parent`, enforcing the
    /// mutual-exclusion rule: more than one identifier of any kind is a
    /// cardinality violation naming the parent.
    pub(crate) fn parse_choice(
        parent: roxmltree::Node<'_, '_>,
        parent_name: &str,
    ) -> Result<Option<Self>> {
        let mut found = Vec::new();
        for node in accessor::children(parent, ns::SAML, "BaseID") {
            found.push(Identifier::BaseId(BaseId::from_xml(node)?));
        }
        for node in accessor::children(parent, ns::SAML, "NameID") {
            found.push(Identifier::NameId(NameId::from_xml(node)?));
        }
        for node in accessor::children(parent, ns::SAML, "EncryptedID") {
            found.push(Identifier::EncryptedId(EncryptedId::from_xml(node)?));
        }

        if found.len() > 1 {
            return Err(Error::TooManyElements(format!(
                "<{parent_name}> carries more than one of BaseID, NameID and EncryptedID"
            )));
        }
        Ok(found.pop())
    }

    pub(crate) fn write_into(&self, parent: &mut Element) {
        match self {
            Identifier::BaseId(base) => base.chunk().write_into(parent),
            Identifier::NameId(name_id) => parent.push(name_id.to_xml()),
            Identifier::EncryptedId(enc) => parent.push(enc.to_xml()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_id_round_trip() {
        let name_id = NameId(NameIdType {
            value: "alice@example.org".into(),
            name_qualifier: None,
            sp_name_qualifier: Some("https://sp.example.org".into()),
            format: Some(ns::NAMEID_EMAIL_ADDRESS.into()),
            sp_provided_id: None,
        });
        let xml = name_id.to_xml().to_string();
        assert_eq!(
            xml,
            concat!(
                r#"<saml:NameID xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" "#,
                r#"SPNameQualifier="https://sp.example.org" "#,
                r#"Format="urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress">"#,
                r#"alice@example.org</saml:NameID>"#
            )
        );
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(NameId::from_xml(doc.root_element()).unwrap(), name_id);
    }

    #[test]
    fn test_name_id_rejects_empty_content() {
        let xml = r#"<saml:NameID xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion"/>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            NameId::from_xml(doc.root_element()),
            Err(Error::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_name_id_rejects_wrong_element() {
        let xml = r#"<saml:Issuer xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">x</saml:Issuer>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            NameId::from_xml(doc.root_element()),
            Err(Error::InvalidElement(_))
        ));
    }

    #[test]
    fn test_invalid_format_uri() {
        assert!(NameId::new("x").unwrap().0.clone().with_format("not a uri").is_err());
    }
}
