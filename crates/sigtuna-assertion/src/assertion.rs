#![forbid(unsafe_code)]

//! The saml:Assertion element and its encrypted form.

use crate::attribute::AttributeStatement;
use crate::conditions::Conditions;
use crate::issuer::Issuer;
use crate::statements::AuthnStatement;
use crate::subject::Subject;
use sigtuna_core::{ns, time, Error, Result};
use sigtuna_security::{EncryptedData, EncryptionBackend, SignatureBackend, Signing};
use sigtuna_xml::{accessor, Element};

/// A statement carried by an assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Authn(AuthnStatement),
    Attribute(AttributeStatement),
}

/// The saml:Assertion element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    id: String,
    issue_instant: i64,
    issuer: Issuer,
    subject: Option<Subject>,
    conditions: Option<Conditions>,
    statements: Vec<Statement>,
    signing: Signing,
}

impl Assertion {
    /// Build an assertion programmatically. The caller supplies a unique
    /// ID token.
    pub fn new(
        id: &str,
        issue_instant: i64,
        issuer: Issuer,
        subject: Option<Subject>,
        conditions: Option<Conditions>,
        statements: Vec<Statement>,
    ) -> Result<Self> {
        if subject.is_none() && statements.is_empty() {
            return Err(Error::MissingElement(
                "<saml:Assertion> without a Subject needs at least one statement".into(),
            ));
        }
        Ok(Self {
            id: accessor::non_empty(id, "saml:Assertion ID")?,
            issue_instant,
            issuer,
            subject,
            conditions,
            statements,
            signing: Signing::unsigned(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn issue_instant(&self) -> i64 {
        self.issue_instant
    }

    pub fn issuer(&self) -> &Issuer {
        &self.issuer
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn conditions(&self) -> Option<&Conditions> {
        self.conditions.as_ref()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn was_signed_at_construction(&self) -> bool {
        self.signing.was_signed_at_construction()
    }

    pub fn is_signed(&self) -> bool {
        self.signing.is_signed()
    }

    /// One-shot signing over the assertion's serialized form.
    pub fn sign(
        &mut self,
        backend: &dyn SignatureBackend,
        key: &[u8],
        algorithm: &str,
    ) -> Result<()> {
        let canonical = self.to_xml().to_bytes();
        self.signing.sign(backend, key, algorithm, canonical)
    }

    /// Verify an attached signature over the retained original bytes.
    pub fn verify(&self, backend: &dyn SignatureBackend, key: &[u8]) -> Result<bool> {
        self.signing.verify(backend, key)
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "Assertion")?;

        let version = accessor::required_attribute(node, ns::attr::VERSION)?;
        if version != ns::SAML_VERSION {
            return Err(Error::ProtocolViolation(format!(
                "unsupported SAML version '{version}' on <saml:Assertion>"
            )));
        }

        let id = accessor::required_attribute(node, ns::attr::ID)?;
        let issue_instant =
            time::parse_instant(accessor::required_attribute(node, ns::attr::ISSUE_INSTANT)?)?;

        let issuer = accessor::exactly_one(
            accessor::children(node, ns::SAML, "Issuer"),
            "saml:Assertion",
            "saml:Issuer",
        )
        .and_then(Issuer::from_xml)?;

        let subject = accessor::at_most_one(
            accessor::children(node, ns::SAML, "Subject"),
            "saml:Assertion",
            "saml:Subject",
        )?
        .map(Subject::from_xml)
        .transpose()?;

        let conditions = accessor::at_most_one(
            accessor::children(node, ns::SAML, "Conditions"),
            "saml:Assertion",
            "saml:Conditions",
        )?
        .map(Conditions::from_xml)
        .transpose()?;

        // Statements in document order.
        let mut statements = Vec::new();
        for child in accessor::element_children(node) {
            let tag = child.tag_name();
            if tag.namespace().unwrap_or("") != ns::SAML {
                continue;
            }
            match tag.name() {
                "AuthnStatement" => {
                    statements.push(Statement::Authn(AuthnStatement::from_xml(child)?))
                }
                "AttributeStatement" => {
                    statements.push(Statement::Attribute(AttributeStatement::from_xml(child)?))
                }
                _ => {}
            }
        }

        let signing = Signing::from_parsed(node)?;

        let mut assertion = Self::new(id, issue_instant, issuer, subject, conditions, statements)?;
        assertion.signing = signing;
        Ok(assertion)
    }

    /// Serialize. Child order is fixed by the schema: Issuer, Signature,
    /// Subject, Conditions, then the statements.
    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "Assertion");
        e.set_attr(ns::attr::ID, &self.id);
        e.set_attr(ns::attr::VERSION, ns::SAML_VERSION);
        e.set_attr(ns::attr::ISSUE_INSTANT, &time::format_instant(self.issue_instant));

        e.push(self.issuer.to_xml());
        self.signing.write_into(&mut e);
        e.push_opt(self.subject.as_ref().map(Subject::to_xml));
        e.push_opt(self.conditions.as_ref().map(Conditions::to_xml));
        for statement in &self.statements {
            match statement {
                Statement::Authn(s) => e.push(s.to_xml()),
                Statement::Attribute(s) => e.push(s.to_xml()),
            }
        }
        e
    }
}

/// The saml:EncryptedAssertion element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedAssertion {
    data: EncryptedData,
}

impl EncryptedAssertion {
    pub fn new(data: EncryptedData) -> Self {
        Self { data }
    }

    pub fn encrypted_data(&self) -> &EncryptedData {
        &self.data
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "EncryptedAssertion")?;
        let data = accessor::exactly_one(
            accessor::children(node, ns::XENC, "EncryptedData"),
            "saml:EncryptedAssertion",
            "xenc:EncryptedData",
        )?;
        Ok(Self {
            data: EncryptedData::from_xml(data)?,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "EncryptedAssertion");
        e.push(self.data.to_xml());
        e
    }

    /// Decrypt into the Assertion the ciphertext represents. The
    /// resulting assertion reports `was_signed_at_construction` from the
    /// decrypted plaintext, so signature state survives the envelope.
    pub fn decrypt(
        &self,
        backend: &dyn EncryptionBackend,
        key: &[u8],
        blacklist: &[&str],
    ) -> Result<Assertion> {
        let plaintext = self.data.decrypt(backend, key, blacklist)?;
        let text = String::from_utf8(plaintext)
            .map_err(|e| Error::XmlParse(format!("decrypted Assertion is not UTF-8: {e}")))?;
        let doc = roxmltree::Document::parse(&text)
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        Assertion::from_xml(doc.root_element())
    }

    /// Encrypt an Assertion into a fresh EncryptedAssertion, recording
    /// the algorithm identifier for later decryption.
    pub fn encrypt(
        assertion: &Assertion,
        backend: &dyn EncryptionBackend,
        key: &[u8],
        algorithm: &str,
    ) -> Result<Self> {
        let plaintext = assertion.to_xml().to_bytes();
        Ok(Self {
            data: EncryptedData::encrypt(&plaintext, backend, key, algorithm)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nameid::{Identifier, NameId};
    use crate::statements::AuthnContext;
    use crate::subject::{Subject, SubjectConfirmation};
    use sigtuna_core::Error;

    fn sample_assertion() -> Assertion {
        let issuer = Issuer::new("https://idp.example.org").unwrap();
        let subject = Subject::new(
            Some(Identifier::NameId(NameId::new("alice@example.org").unwrap())),
            vec![SubjectConfirmation::new(ns::CM_BEARER, None, None).unwrap()],
        )
        .unwrap();
        let statement = AuthnStatement::new(
            1_102_238_519,
            AuthnContext::new(
                Some("urn:oasis:names:tc:SAML:2.0:ac:classes:Password".into()),
                None,
                vec![],
            )
            .unwrap(),
        );
        Assertion::new(
            "_abc123",
            1_102_238_519,
            issuer,
            Some(subject),
            None,
            vec![Statement::Authn(statement)],
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let assertion = sample_assertion();
        let xml = assertion.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let reparsed = Assertion::from_xml(doc.root_element()).unwrap();
        assert_eq!(reparsed, assertion);
        assert!(!reparsed.was_signed_at_construction());
    }

    #[test]
    fn test_statement_order_preserved() {
        let mut assertion = sample_assertion();
        assertion.statements.push(Statement::Attribute(
            AttributeStatement::new(
                vec![crate::attribute::Attribute::new("mail", vec!["a@b".into()]).unwrap()],
                vec![],
            )
            .unwrap(),
        ));
        let xml = assertion.to_xml().to_string();
        let authn_pos = xml.find("AuthnStatement").unwrap();
        let attr_pos = xml.find("AttributeStatement").unwrap();
        assert!(authn_pos < attr_pos);
    }

    #[test]
    fn test_version_must_be_2_0() {
        let xml = concat!(
            r#"<saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" "#,
            r#"ID="_a" Version="1.1" IssueInstant="2004-12-05T09:21:59Z">"#,
            r#"<saml:Issuer>x</saml:Issuer>"#,
            r#"<saml:AuthnStatement AuthnInstant="2004-12-05T09:21:59Z">"#,
            r#"<saml:AuthnContext><saml:AuthnContextClassRef>urn:x</saml:AuthnContextClassRef>"#,
            r#"</saml:AuthnContext></saml:AuthnStatement>"#,
            r#"</saml:Assertion>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            Assertion::from_xml(doc.root_element()),
            Err(Error::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_assertion_without_subject_or_statements_rejected() {
        let issuer = Issuer::new("https://idp.example.org").unwrap();
        assert!(matches!(
            Assertion::new("_a", 0, issuer, None, None, vec![]),
            Err(Error::MissingElement(_))
        ));
    }
}
