#![forbid(unsafe_code)]

//! The saml:Issuer element.

use crate::nameid::NameIdType;
use sigtuna_core::{ns, Result};
use sigtuna_xml::{accessor, Element};

/// The saml:Issuer element (a NameIDType naming the asserting party).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuer(pub NameIdType);

impl Issuer {
    pub fn new(value: &str) -> Result<Self> {
        Ok(Self(NameIdType::new(value)?))
    }

    pub fn value(&self) -> &str {
        &self.0.value
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "Issuer")?;
        Ok(Self(NameIdType::parse(node)?))
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "Issuer");
        self.0.write(&mut e);
        e
    }
}
