#![forbid(unsafe_code)]

//! Authentication statements: AuthnStatement, AuthnContext and
//! SubjectLocality.

use sigtuna_core::{ns, time, Error, Result};
use sigtuna_xml::{accessor, Element};

/// The saml:SubjectLocality element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectLocality {
    pub address: Option<String>,
    pub dns_name: Option<String>,
}

impl SubjectLocality {
    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "SubjectLocality")?;
        Ok(Self {
            address: accessor::optional_attribute(node, "Address").map(str::to_owned),
            dns_name: accessor::optional_attribute(node, "DNSName").map(str::to_owned),
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "SubjectLocality");
        e.set_attr_opt("Address", self.address.as_deref());
        e.set_attr_opt("DNSName", self.dns_name.as_deref());
        e
    }
}

/// The saml:AuthnContext element.
///
/// Schema rule: a class reference, a declaration reference, or both —
/// an AuthnContext naming neither says nothing and is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthnContext {
    class_ref: Option<String>,
    decl_ref: Option<String>,
    authenticating_authorities: Vec<String>,
}

impl AuthnContext {
    pub fn new(
        class_ref: Option<String>,
        decl_ref: Option<String>,
        authenticating_authorities: Vec<String>,
    ) -> Result<Self> {
        if class_ref.is_none() && decl_ref.is_none() {
            return Err(Error::MissingElement(
                "<saml:AuthnContext> needs an AuthnContextClassRef or AuthnContextDeclRef"
                    .into(),
            ));
        }
        if let Some(class_ref) = &class_ref {
            accessor::valid_uri(class_ref, "saml:AuthnContextClassRef")?;
        }
        if let Some(decl_ref) = &decl_ref {
            accessor::valid_uri(decl_ref, "saml:AuthnContextDeclRef")?;
        }
        Ok(Self {
            class_ref,
            decl_ref,
            authenticating_authorities,
        })
    }

    pub fn class_ref(&self) -> Option<&str> {
        self.class_ref.as_deref()
    }

    pub fn decl_ref(&self) -> Option<&str> {
        self.decl_ref.as_deref()
    }

    pub fn authenticating_authorities(&self) -> &[String] {
        &self.authenticating_authorities
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "AuthnContext")?;

        let class_ref = accessor::at_most_one(
            accessor::children(node, ns::SAML, "AuthnContextClassRef"),
            "saml:AuthnContext",
            "saml:AuthnContextClassRef",
        )?
        .map(|n| accessor::text_content(n));

        let decl_ref = accessor::at_most_one(
            accessor::children(node, ns::SAML, "AuthnContextDeclRef"),
            "saml:AuthnContext",
            "saml:AuthnContextDeclRef",
        )?
        .map(|n| accessor::text_content(n));

        let authenticating_authorities =
            accessor::children(node, ns::SAML, "AuthenticatingAuthority")
                .into_iter()
                .map(|n| {
                    accessor::non_empty(
                        &accessor::text_content(n),
                        "saml:AuthenticatingAuthority",
                    )
                })
                .collect::<Result<Vec<_>>>()?;

        Self::new(class_ref, decl_ref, authenticating_authorities)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "AuthnContext");
        if let Some(class_ref) = &self.class_ref {
            let mut c = Element::new(ns::prefix::SAML, ns::SAML, "AuthnContextClassRef");
            c.push_text(class_ref);
            e.push(c);
        }
        if let Some(decl_ref) = &self.decl_ref {
            let mut d = Element::new(ns::prefix::SAML, ns::SAML, "AuthnContextDeclRef");
            d.push_text(decl_ref);
            e.push(d);
        }
        for authority in &self.authenticating_authorities {
            let mut a = Element::new(ns::prefix::SAML, ns::SAML, "AuthenticatingAuthority");
            a.push_text(authority);
            e.push(a);
        }
        e
    }
}

/// The saml:AuthnStatement element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthnStatement {
    authn_instant: i64,
    session_index: Option<String>,
    session_not_on_or_after: Option<i64>,
    subject_locality: Option<SubjectLocality>,
    authn_context: AuthnContext,
}

impl AuthnStatement {
    pub fn new(authn_instant: i64, authn_context: AuthnContext) -> Self {
        Self {
            authn_instant,
            session_index: None,
            session_not_on_or_after: None,
            subject_locality: None,
            authn_context,
        }
    }

    pub fn with_session_index(mut self, session_index: &str) -> Self {
        self.session_index = Some(session_index.to_owned());
        self
    }

    pub fn with_session_not_on_or_after(mut self, instant: i64) -> Self {
        self.session_not_on_or_after = Some(instant);
        self
    }

    pub fn with_subject_locality(mut self, locality: SubjectLocality) -> Self {
        self.subject_locality = Some(locality);
        self
    }

    pub fn authn_instant(&self) -> i64 {
        self.authn_instant
    }

    pub fn session_index(&self) -> Option<&str> {
        self.session_index.as_deref()
    }

    pub fn authn_context(&self) -> &AuthnContext {
        &self.authn_context
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "AuthnStatement")?;

        let authn_instant =
            time::parse_instant(accessor::required_attribute(node, "AuthnInstant")?)?;
        let session_not_on_or_after = accessor::optional_attribute(node, "SessionNotOnOrAfter")
            .map(time::parse_instant)
            .transpose()?;

        let subject_locality = accessor::at_most_one(
            accessor::children(node, ns::SAML, "SubjectLocality"),
            "saml:AuthnStatement",
            "saml:SubjectLocality",
        )?
        .map(SubjectLocality::from_xml)
        .transpose()?;

        let authn_context = accessor::exactly_one(
            accessor::children(node, ns::SAML, "AuthnContext"),
            "saml:AuthnStatement",
            "saml:AuthnContext",
        )
        .and_then(AuthnContext::from_xml)?;

        Ok(Self {
            authn_instant,
            session_index: accessor::optional_attribute(node, "SessionIndex")
                .map(str::to_owned),
            session_not_on_or_after,
            subject_locality,
            authn_context,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "AuthnStatement");
        e.set_attr("AuthnInstant", &time::format_instant(self.authn_instant));
        e.set_attr_opt("SessionIndex", self.session_index.as_deref());
        e.set_attr_opt(
            "SessionNotOnOrAfter",
            self.session_not_on_or_after
                .map(time::format_instant)
                .as_deref(),
        );
        e.push_opt(self.subject_locality.as_ref().map(SubjectLocality::to_xml));
        e.push(self.authn_context.to_xml());
        e
    }
}
