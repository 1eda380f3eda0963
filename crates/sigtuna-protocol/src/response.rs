#![forbid(unsafe_code)]

//! samlp:Response carrying assertions back to the requester.

use crate::message::MessageFields;
use crate::status::Status;
use sigtuna_assertion::{Assertion, EncryptedAssertion};
use sigtuna_core::{ns, Result};
use sigtuna_security::SignatureBackend;
use sigtuna_xml::{accessor, Element};

/// An assertion child of a response, encrypted or not, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseAssertion {
    Plain(Box<Assertion>),
    Encrypted(EncryptedAssertion),
}

/// The samlp:Response message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    fields: MessageFields,
    in_response_to: Option<String>,
    status: Status,
    assertions: Vec<ResponseAssertion>,
}

impl Response {
    pub fn new(fields: MessageFields, status: Status) -> Self {
        Self {
            fields,
            in_response_to: None,
            status,
            assertions: Vec::new(),
        }
    }

    pub fn with_in_response_to(mut self, request_id: &str) -> Result<Self> {
        self.in_response_to = Some(accessor::non_empty(request_id, "InResponseTo")?);
        Ok(self)
    }

    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions
            .push(ResponseAssertion::Plain(Box::new(assertion)));
        self
    }

    pub fn with_encrypted_assertion(mut self, assertion: EncryptedAssertion) -> Self {
        self.assertions.push(ResponseAssertion::Encrypted(assertion));
        self
    }

    pub fn fields(&self) -> &MessageFields {
        &self.fields
    }

    pub fn in_response_to(&self) -> Option<&str> {
        self.in_response_to.as_deref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn assertions(&self) -> &[ResponseAssertion] {
        &self.assertions
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "Response")?;
        let fields = MessageFields::parse(node)?;

        let in_response_to = accessor::optional_attribute(node, "InResponseTo")
            .map(|v| accessor::non_empty(v, "InResponseTo"))
            .transpose()?;

        let status = accessor::exactly_one(
            accessor::children(node, ns::SAMLP, "Status"),
            "samlp:Response",
            "samlp:Status",
        )
        .and_then(Status::from_xml)?;

        let mut assertions = Vec::new();
        for child in accessor::element_children(node) {
            let tag = child.tag_name();
            if tag.namespace().unwrap_or("") != ns::SAML {
                continue;
            }
            match tag.name() {
                "Assertion" => assertions.push(ResponseAssertion::Plain(Box::new(
                    Assertion::from_xml(child)?,
                ))),
                "EncryptedAssertion" => assertions.push(ResponseAssertion::Encrypted(
                    EncryptedAssertion::from_xml(child)?,
                )),
                _ => {}
            }
        }

        Ok(Self {
            fields,
            in_response_to,
            status,
            assertions,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "Response");
        e.declare_ns(ns::prefix::SAML, ns::SAML);
        self.fields.write_attrs(&mut e);
        e.set_attr_opt("InResponseTo", self.in_response_to.as_deref());
        self.fields.write_children(&mut e);
        e.push(self.status.to_xml());
        for assertion in &self.assertions {
            match assertion {
                ResponseAssertion::Plain(a) => e.push(a.to_xml()),
                ResponseAssertion::Encrypted(a) => e.push(a.to_xml()),
            }
        }
        e
    }

    pub fn sign(
        &mut self,
        backend: &dyn SignatureBackend,
        key: &[u8],
        algorithm: &str,
    ) -> Result<()> {
        let bytes = self.to_xml().to_bytes();
        self.fields.signing_mut().sign(backend, key, algorithm, bytes)
    }

    pub fn verify(&self, backend: &dyn SignatureBackend, key: &[u8]) -> Result<bool> {
        self.fields.verify(backend, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_assertion::Issuer;
    use sigtuna_core::Error;

    #[test]
    fn test_round_trip_with_status() {
        let fields = MessageFields::new("_resp1", 1623508200)
            .unwrap()
            .with_issuer(Issuer::new("https://idp.example.org").unwrap());
        let response = Response::new(fields, Status::success())
            .with_in_response_to("_authn1")
            .unwrap();

        let xml = response.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let parsed = Response::from_xml(doc.root_element()).unwrap();
        assert_eq!(parsed, response);
        assert!(parsed.status().is_success());
        assert_eq!(parsed.in_response_to(), Some("_authn1"));
    }

    #[test]
    fn test_response_without_status_rejected() {
        let xml = concat!(
            r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" "#,
            r#"ID="_r" Version="2.0" IssueInstant="2021-06-12T14:30:00Z"/>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            Response::from_xml(doc.root_element()),
            Err(Error::MissingElement(_))
        ));
    }

    #[test]
    fn test_assertions_kept_in_document_order() {
        let xml = concat!(
            r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" "#,
            r#"xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" "#,
            r#"xmlns:xenc="http://www.w3.org/2001/04/xmlenc#" "#,
            r#"ID="_r" Version="2.0" IssueInstant="2021-06-12T14:30:00Z">"#,
            r#"<samlp:Status><samlp:StatusCode "#,
            r#"Value="urn:oasis:names:tc:SAML:2.0:status:Success"/></samlp:Status>"#,
            r#"<saml:EncryptedAssertion><xenc:EncryptedData>"#,
            r#"<xenc:EncryptionMethod Algorithm="http://www.w3.org/2009/xmlenc11#aes128-gcm"/>"#,
            r#"<xenc:CipherData><xenc:CipherValue>AQID</xenc:CipherValue></xenc:CipherData>"#,
            r#"</xenc:EncryptedData></saml:EncryptedAssertion>"#,
            r#"</samlp:Response>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        let parsed = Response::from_xml(doc.root_element()).unwrap();
        assert_eq!(parsed.assertions().len(), 1);
        assert!(matches!(
            parsed.assertions()[0],
            ResponseAssertion::Encrypted(_)
        ));
    }
}
