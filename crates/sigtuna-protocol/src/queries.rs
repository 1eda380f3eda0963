#![forbid(unsafe_code)]

//! Subject-based queries: samlp:AttributeQuery and samlp:AuthnQuery.
//!
//! Both are built on the same shape, a request envelope plus a mandatory
//! saml:Subject naming the principal the query is about.

use crate::authn_request::RequestedAuthnContext;
use crate::message::MessageFields;
use sigtuna_assertion::{Attribute, Subject};
use sigtuna_core::{ns, Error, Result};
use sigtuna_security::SignatureBackend;
use sigtuna_xml::{accessor, Element};
use std::collections::HashSet;

/// The fields shared by every subject query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectQuery {
    fields: MessageFields,
    subject: Subject,
}

impl SubjectQuery {
    pub fn new(fields: MessageFields, subject: Subject) -> Self {
        Self { fields, subject }
    }

    pub fn fields(&self) -> &MessageFields {
        &self.fields
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Parse the envelope and the mandatory saml:Subject off a query node.
    pub fn parse(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        let fields = MessageFields::parse(node)?;
        let parent = node.tag_name().name().to_owned();
        let subject = accessor::exactly_one(
            accessor::children(node, ns::SAML, "Subject"),
            &parent,
            "saml:Subject",
        )
        .and_then(Subject::from_xml)?;
        Ok(Self { fields, subject })
    }

    /// Emit envelope attributes and the leading children, Subject last.
    pub fn write_into(&self, e: &mut Element) {
        self.fields.write_attrs(e);
        self.fields.write_children(e);
        e.push(self.subject.to_xml());
    }
}

/// The samlp:AttributeQuery message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeQuery {
    query: SubjectQuery,
    attributes: Vec<Attribute>,
}

impl AttributeQuery {
    /// Build a query. Two requested attributes with the same Name and
    /// NameFormat would make the responder's answer ambiguous, so the
    /// pair must be unique across the list.
    pub fn new(
        fields: MessageFields,
        subject: Subject,
        attributes: Vec<Attribute>,
    ) -> Result<Self> {
        check_unique_names(&attributes)?;
        Ok(Self {
            query: SubjectQuery::new(fields, subject),
            attributes,
        })
    }

    pub fn fields(&self) -> &MessageFields {
        self.query.fields()
    }

    pub fn subject(&self) -> &Subject {
        self.query.subject()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "AttributeQuery")?;
        let query = SubjectQuery::parse(node)?;
        let attributes = accessor::children(node, ns::SAML, "Attribute")
            .into_iter()
            .map(Attribute::from_xml)
            .collect::<Result<Vec<_>>>()?;
        check_unique_names(&attributes)?;
        Ok(Self { query, attributes })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "AttributeQuery");
        e.declare_ns(ns::prefix::SAML, ns::SAML);
        self.query.write_into(&mut e);
        for attribute in &self.attributes {
            e.push(attribute.to_xml());
        }
        e
    }

    pub fn verify(&self, backend: &dyn SignatureBackend, key: &[u8]) -> Result<bool> {
        self.query.fields.verify(backend, key)
    }
}

fn check_unique_names(attributes: &[Attribute]) -> Result<()> {
    let mut seen = HashSet::new();
    for attribute in attributes {
        let key = (attribute.name(), attribute.name_format());
        if !seen.insert(key) {
            return Err(Error::ProtocolViolation(format!(
                "duplicate attribute Name '{}' in <samlp:AttributeQuery>",
                attribute.name()
            )));
        }
    }
    Ok(())
}

/// The samlp:AuthnQuery message, asking which authentication acts an
/// authority has seen for a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthnQuery {
    query: SubjectQuery,
    session_index: Option<String>,
    requested_authn_context: Option<RequestedAuthnContext>,
}

impl AuthnQuery {
    pub fn new(fields: MessageFields, subject: Subject) -> Self {
        Self {
            query: SubjectQuery::new(fields, subject),
            session_index: None,
            requested_authn_context: None,
        }
    }

    pub fn with_session_index(mut self, index: &str) -> Result<Self> {
        self.session_index = Some(accessor::non_empty(index, "AuthnQuery SessionIndex")?);
        Ok(self)
    }

    pub fn with_requested_authn_context(mut self, ctx: RequestedAuthnContext) -> Self {
        self.requested_authn_context = Some(ctx);
        self
    }

    pub fn fields(&self) -> &MessageFields {
        self.query.fields()
    }

    pub fn subject(&self) -> &Subject {
        self.query.subject()
    }

    pub fn session_index(&self) -> Option<&str> {
        self.session_index.as_deref()
    }

    pub fn requested_authn_context(&self) -> Option<&RequestedAuthnContext> {
        self.requested_authn_context.as_ref()
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "AuthnQuery")?;
        let query = SubjectQuery::parse(node)?;
        let session_index = accessor::optional_attribute(node, "SessionIndex")
            .map(|v| accessor::non_empty(v, "AuthnQuery SessionIndex"))
            .transpose()?;
        let requested_authn_context = accessor::at_most_one(
            accessor::children(node, ns::SAMLP, "RequestedAuthnContext"),
            "samlp:AuthnQuery",
            "samlp:RequestedAuthnContext",
        )?
        .map(RequestedAuthnContext::from_xml)
        .transpose()?;
        Ok(Self {
            query,
            session_index,
            requested_authn_context,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "AuthnQuery");
        e.declare_ns(ns::prefix::SAML, ns::SAML);
        self.query.fields.write_attrs(&mut e);
        e.set_attr_opt("SessionIndex", self.session_index.as_deref());
        self.query.fields.write_children(&mut e);
        e.push(self.query.subject.to_xml());
        e.push_opt(
            self.requested_authn_context
                .as_ref()
                .map(RequestedAuthnContext::to_xml),
        );
        e
    }

    pub fn verify(&self, backend: &dyn SignatureBackend, key: &[u8]) -> Result<bool> {
        self.query.fields.verify(backend, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_assertion::{Identifier, Issuer, NameId, SubjectConfirmation};

    fn subject() -> Subject {
        Subject::new(
            Some(Identifier::NameId(NameId::new("alice@example.org").unwrap())),
            vec![SubjectConfirmation::new(ns::CM_BEARER, None, None).unwrap()],
        )
        .unwrap()
    }

    fn fields(id: &str) -> MessageFields {
        MessageFields::new(id, 1623508200)
            .unwrap()
            .with_issuer(Issuer::new("https://sp.example.org").unwrap())
    }

    #[test]
    fn test_attribute_query_round_trip() {
        let query = AttributeQuery::new(
            fields("_q1"),
            subject(),
            vec![
                Attribute::new("mail", vec![]).unwrap(),
                Attribute::new("displayName", vec![]).unwrap(),
            ],
        )
        .unwrap();

        let xml = query.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let parsed = AttributeQuery::from_xml(doc.root_element()).unwrap();
        assert_eq!(parsed, query);
        assert_eq!(parsed.attributes().len(), 2);
    }

    #[test]
    fn test_duplicate_attribute_names_rejected() {
        let result = AttributeQuery::new(
            fields("_q2"),
            subject(),
            vec![
                Attribute::new("mail", vec![]).unwrap(),
                Attribute::new("mail", vec![]).unwrap(),
            ],
        );
        assert!(matches!(result, Err(Error::ProtocolViolation(_))));
    }

    #[test]
    fn test_same_name_different_format_allowed() {
        let with_format = Attribute::new("mail", vec![])
            .unwrap()
            .with_name_format("urn:oasis:names:tc:SAML:2.0:attrname-format:basic")
            .unwrap();
        let result = AttributeQuery::new(
            fields("_q3"),
            subject(),
            vec![Attribute::new("mail", vec![]).unwrap(), with_format],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_authn_query_session_index_round_trip() {
        let query = AuthnQuery::new(fields("_q4"), subject())
            .with_session_index("idx-27")
            .unwrap();
        let xml = query.to_xml().to_string();
        assert!(xml.contains(r#"<samlp:AuthnQuery "#));
        assert!(xml.contains(r#"SessionIndex="idx-27""#));

        let doc = roxmltree::Document::parse(&xml).unwrap();
        let parsed = AuthnQuery::from_xml(doc.root_element()).unwrap();
        assert_eq!(parsed.session_index(), Some("idx-27"));
        assert_eq!(parsed, query);
    }

    #[test]
    fn test_query_without_subject_rejected() {
        let xml = concat!(
            r#"<samlp:AuthnQuery xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" "#,
            r#"ID="_q" Version="2.0" IssueInstant="2021-06-12T14:30:00Z"/>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            AuthnQuery::from_xml(doc.root_element()),
            Err(Error::MissingElement(_))
        ));
    }
}
