#![forbid(unsafe_code)]

//! The ecp:SubjectConfirmation SOAP header block.

use crate::soap;
use sigtuna_assertion::SubjectConfirmationData;
use sigtuna_core::{ns, Result};
use sigtuna_xml::{accessor, Element};

/// The ecp:SubjectConfirmation element: a confirmation method plus
/// optional data, carried as a SOAP header with the usual ECP attribute
/// rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectConfirmation {
    method: String,
    data: Option<SubjectConfirmationData>,
}

impl SubjectConfirmation {
    pub fn new(method: &str, data: Option<SubjectConfirmationData>) -> Result<Self> {
        Ok(Self {
            method: accessor::valid_uri(method, "ecp:SubjectConfirmation Method")?,
            data,
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn data(&self) -> Option<&SubjectConfirmationData> {
        self.data.as_ref()
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::ECP, "SubjectConfirmation")?;
        soap::check_must_understand(node)?;
        soap::check_actor(node)?;

        let method = accessor::required_attribute(node, ns::attr::METHOD)?;
        let data = accessor::at_most_one(
            accessor::children(node, ns::SAML, "SubjectConfirmationData"),
            "ecp:SubjectConfirmation",
            "saml:SubjectConfirmationData",
        )?
        .map(SubjectConfirmationData::from_xml)
        .transpose()?;

        Self::new(method, data)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::ECP, ns::ECP, "SubjectConfirmation");
        soap::write_header_attrs(&mut e, "1");
        e.set_attr(ns::attr::METHOD, &self.method);
        e.push_opt(self.data.as_ref().map(SubjectConfirmationData::to_xml));
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_core::Error;

    #[test]
    fn test_round_trip() {
        let data = SubjectConfirmationData {
            not_on_or_after: Some(1_623_508_200),
            ..Default::default()
        };
        let confirmation = SubjectConfirmation::new(ns::CM_HOLDER_OF_KEY, Some(data)).unwrap();
        let xml = confirmation.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(
            SubjectConfirmation::from_xml(doc.root_element()).unwrap(),
            confirmation
        );
    }

    #[test]
    fn test_soap_attrs_required() {
        let xml = concat!(
            r#"<ecp:SubjectConfirmation "#,
            r#"xmlns:ecp="urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp" "#,
            r#"Method="urn:oasis:names:tc:SAML:2.0:cm:bearer"/>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            SubjectConfirmation::from_xml(doc.root_element()),
            Err(Error::MissingAttribute(_))
        ));
    }
}
