#![forbid(unsafe_code)]

//! The common request/response envelope shared by every samlp message:
//! ID, Version, IssueInstant, Destination, Consent, Issuer, Extensions
//! and Signature.

use crate::extensions::Extensions;
use sigtuna_core::{ns, time, Error, Result};
use sigtuna_assertion::Issuer;
use sigtuna_security::{SignatureBackend, Signing};
use sigtuna_xml::{accessor, Element};

/// Validate a message's Version attribute.
///
/// A version above "2.0" and one below it are distinct protocol
/// violations: a responder may want to answer them with different
/// VersionMismatch status codes rather than a generic rejection.
pub fn check_version(version: &str) -> Result<()> {
    let (major, minor) = parse_version(version)?;
    match (major, minor).cmp(&(2, 0)) {
        std::cmp::Ordering::Greater => Err(Error::RequestVersionTooHigh(format!(
            "message version {version} is newer than 2.0"
        ))),
        std::cmp::Ordering::Less => Err(Error::RequestVersionTooLow(format!(
            "message version {version} is older than 2.0"
        ))),
        std::cmp::Ordering::Equal => Ok(()),
    }
}

fn parse_version(version: &str) -> Result<(u32, u32)> {
    let invalid = || {
        Error::ProtocolViolation(format!("'{version}' is not a SAML version number"))
    };
    let (major, minor) = version.split_once('.').ok_or_else(invalid)?;
    Ok((
        major.parse().map_err(|_| invalid())?,
        minor.parse().map_err(|_| invalid())?,
    ))
}

/// The shared fields of every samlp request and response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFields {
    id: String,
    issue_instant: i64,
    destination: Option<String>,
    consent: Option<String>,
    issuer: Option<Issuer>,
    extensions: Option<Extensions>,
    signing: Signing,
}

impl MessageFields {
    /// Start an envelope. The caller is responsible for generating a
    /// unique ID token.
    pub fn new(id: &str, issue_instant: i64) -> Result<Self> {
        Ok(Self {
            id: accessor::non_empty(id, "message ID")?,
            issue_instant,
            destination: None,
            consent: None,
            issuer: None,
            extensions: None,
            signing: Signing::unsigned(),
        })
    }

    pub fn with_destination(mut self, destination: &str) -> Result<Self> {
        self.destination = Some(accessor::valid_uri(destination, "Destination")?);
        Ok(self)
    }

    pub fn with_consent(mut self, consent: &str) -> Result<Self> {
        self.consent = Some(accessor::valid_uri(consent, "Consent")?);
        Ok(self)
    }

    pub fn with_issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn issue_instant(&self) -> i64 {
        self.issue_instant
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn consent(&self) -> Option<&str> {
        self.consent.as_deref()
    }

    pub fn issuer(&self) -> Option<&Issuer> {
        self.issuer.as_ref()
    }

    pub fn extensions(&self) -> Option<&Extensions> {
        self.extensions.as_ref()
    }

    pub fn was_signed_at_construction(&self) -> bool {
        self.signing.was_signed_at_construction()
    }

    pub fn is_signed(&self) -> bool {
        self.signing.is_signed()
    }

    pub(crate) fn signing_mut(&mut self) -> &mut Signing {
        &mut self.signing
    }

    /// Verify an attached signature over the retained original bytes.
    pub fn verify(&self, backend: &dyn SignatureBackend, key: &[u8]) -> Result<bool> {
        self.signing.verify(backend, key)
    }

    /// Parse the shared attributes and children off a message node.
    /// The version gates run first: a mismatched version is the most
    /// actionable failure.
    pub fn parse(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        check_version(accessor::required_attribute(node, ns::attr::VERSION)?)?;

        let id = accessor::required_attribute(node, ns::attr::ID)?;
        let issue_instant =
            time::parse_instant(accessor::required_attribute(node, ns::attr::ISSUE_INSTANT)?)?;

        let parent = node.tag_name().name().to_owned();

        let issuer = accessor::at_most_one(
            accessor::children(node, ns::SAML, "Issuer"),
            &parent,
            "saml:Issuer",
        )?
        .map(Issuer::from_xml)
        .transpose()?;

        let extensions = accessor::at_most_one(
            accessor::children(node, ns::SAMLP, "Extensions"),
            &parent,
            "samlp:Extensions",
        )?
        .map(Extensions::from_xml)
        .transpose()?;

        let destination = match accessor::optional_attribute(node, ns::attr::DESTINATION) {
            Some(d) => Some(accessor::valid_uri(d, "Destination")?),
            None => None,
        };
        let consent = match accessor::optional_attribute(node, ns::attr::CONSENT) {
            Some(c) => Some(accessor::valid_uri(c, "Consent")?),
            None => None,
        };

        let mut fields = Self::new(id, issue_instant)?;
        fields.destination = destination;
        fields.consent = consent;
        fields.issuer = issuer;
        fields.extensions = extensions;
        fields.signing = Signing::from_parsed(node)?;
        Ok(fields)
    }

    /// Emit the shared attributes onto a message element.
    pub fn write_attrs(&self, e: &mut Element) {
        e.set_attr(ns::attr::ID, &self.id);
        e.set_attr(ns::attr::VERSION, ns::SAML_VERSION);
        e.set_attr(ns::attr::ISSUE_INSTANT, &time::format_instant(self.issue_instant));
        e.set_attr_opt(ns::attr::DESTINATION, self.destination.as_deref());
        e.set_attr_opt(ns::attr::CONSENT, self.consent.as_deref());
    }

    /// Emit the shared leading children in schema order: Issuer,
    /// Signature, Extensions.
    pub fn write_children(&self, e: &mut Element) {
        e.push_opt(self.issuer.as_ref().map(Issuer::to_xml));
        self.signing.write_into(e);
        e.push_opt(self.extensions.as_ref().map(Extensions::to_xml));
    }
}
