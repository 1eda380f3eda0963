#![forbid(unsafe_code)]

//! Attribute, AttributeStatement and EncryptedAttribute.

use sigtuna_core::{ns, Error, Result};
use sigtuna_security::{EncryptedData, EncryptionBackend};
use sigtuna_xml::{accessor, Element};

/// The saml:Attribute element.
///
/// Values are kept as strings; typed AttributeValue content (xsi:type
/// integers, nested NameIDs) stays in its lexical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    name_format: Option<String>,
    friendly_name: Option<String>,
    values: Vec<String>,
}

impl Attribute {
    pub fn new(name: &str, values: Vec<String>) -> Result<Self> {
        Ok(Self {
            name: accessor::non_empty(name, "saml:Attribute Name")?,
            name_format: None,
            friendly_name: None,
            values,
        })
    }

    pub fn with_name_format(mut self, name_format: &str) -> Result<Self> {
        self.name_format = Some(accessor::valid_uri(name_format, "saml:Attribute NameFormat")?);
        Ok(self)
    }

    pub fn with_friendly_name(mut self, friendly_name: &str) -> Self {
        self.friendly_name = Some(friendly_name.to_owned());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_format(&self) -> Option<&str> {
        self.name_format.as_deref()
    }

    pub fn friendly_name(&self) -> Option<&str> {
        self.friendly_name.as_deref()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "Attribute")?;

        let name = accessor::required_attribute(node, "Name")?;
        let name_format = match accessor::optional_attribute(node, "NameFormat") {
            Some(f) => Some(accessor::valid_uri(f, "saml:Attribute NameFormat")?),
            None => None,
        };
        let values = accessor::children(node, ns::SAML, "AttributeValue")
            .into_iter()
            .map(accessor::text_content)
            .collect();

        let mut attribute = Self::new(name, values)?;
        attribute.name_format = name_format;
        attribute.friendly_name =
            accessor::optional_attribute(node, "FriendlyName").map(str::to_owned);
        Ok(attribute)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "Attribute");
        e.set_attr("Name", &self.name);
        e.set_attr_opt("NameFormat", self.name_format.as_deref());
        e.set_attr_opt("FriendlyName", self.friendly_name.as_deref());
        for value in &self.values {
            let mut v = Element::new(ns::prefix::SAML, ns::SAML, "AttributeValue");
            v.push_text(value);
            e.push(v);
        }
        e
    }
}

/// The saml:EncryptedAttribute element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedAttribute {
    data: EncryptedData,
}

impl EncryptedAttribute {
    pub fn new(data: EncryptedData) -> Self {
        Self { data }
    }

    pub fn encrypted_data(&self) -> &EncryptedData {
        &self.data
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "EncryptedAttribute")?;
        let data = accessor::exactly_one(
            accessor::children(node, ns::XENC, "EncryptedData"),
            "saml:EncryptedAttribute",
            "xenc:EncryptedData",
        )?;
        Ok(Self {
            data: EncryptedData::from_xml(data)?,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "EncryptedAttribute");
        e.push(self.data.to_xml());
        e
    }

    /// Decrypt into the Attribute the ciphertext represents.
    pub fn decrypt(
        &self,
        backend: &dyn EncryptionBackend,
        key: &[u8],
        blacklist: &[&str],
    ) -> Result<Attribute> {
        let plaintext = self.data.decrypt(backend, key, blacklist)?;
        let text = String::from_utf8(plaintext)
            .map_err(|e| Error::XmlParse(format!("decrypted Attribute is not UTF-8: {e}")))?;
        let doc = roxmltree::Document::parse(&text)
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        Attribute::from_xml(doc.root_element())
    }

    /// Encrypt an Attribute into a fresh EncryptedAttribute.
    pub fn encrypt(
        attribute: &Attribute,
        backend: &dyn EncryptionBackend,
        key: &[u8],
        algorithm: &str,
    ) -> Result<Self> {
        let plaintext = attribute.to_xml().to_bytes();
        Ok(Self {
            data: EncryptedData::encrypt(&plaintext, backend, key, algorithm)?,
        })
    }
}

/// The saml:AttributeStatement element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeStatement {
    attributes: Vec<Attribute>,
    encrypted_attributes: Vec<EncryptedAttribute>,
}

impl AttributeStatement {
    pub fn new(
        attributes: Vec<Attribute>,
        encrypted_attributes: Vec<EncryptedAttribute>,
    ) -> Result<Self> {
        if attributes.is_empty() && encrypted_attributes.is_empty() {
            return Err(Error::MissingElement(
                "<saml:AttributeStatement> needs at least one Attribute or EncryptedAttribute"
                    .into(),
            ));
        }
        Ok(Self {
            attributes,
            encrypted_attributes,
        })
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn encrypted_attributes(&self) -> &[EncryptedAttribute] {
        &self.encrypted_attributes
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "AttributeStatement")?;
        let attributes = accessor::children(node, ns::SAML, "Attribute")
            .into_iter()
            .map(Attribute::from_xml)
            .collect::<Result<Vec<_>>>()?;
        let encrypted_attributes = accessor::children(node, ns::SAML, "EncryptedAttribute")
            .into_iter()
            .map(EncryptedAttribute::from_xml)
            .collect::<Result<Vec<_>>>()?;
        Self::new(attributes, encrypted_attributes)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "AttributeStatement");
        for attribute in &self.attributes {
            e.push(attribute.to_xml());
        }
        for encrypted in &self.encrypted_attributes {
            e.push(encrypted.to_xml());
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_round_trip() {
        let attribute = Attribute::new(
            "urn:oid:0.9.2342.19200300.100.1.3",
            vec!["alice@example.org".into(), "alice@example.net".into()],
        )
        .unwrap()
        .with_name_format("urn:oasis:names:tc:SAML:2.0:attrname-format:uri")
        .unwrap()
        .with_friendly_name("mail");

        let xml = attribute.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(Attribute::from_xml(doc.root_element()).unwrap(), attribute);
    }

    #[test]
    fn test_empty_statement_rejected() {
        assert!(matches!(
            AttributeStatement::new(vec![], vec![]),
            Err(Error::MissingElement(_))
        ));
    }

    #[test]
    fn test_attribute_requires_name() {
        let xml = r#"<saml:Attribute xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion"/>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            Attribute::from_xml(doc.root_element()),
            Err(Error::MissingAttribute(_))
        ));
    }
}
