#![forbid(unsafe_code)]

//! Subject, SubjectConfirmation and SubjectConfirmationData.

use crate::nameid::Identifier;
use sigtuna_core::{ns, time, Error, Result};
use sigtuna_xml::{accessor, Element};

/// The saml:SubjectConfirmationData element (attributes only; arbitrary
/// child content is out of scope here).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectConfirmationData {
    pub not_before: Option<i64>,
    pub not_on_or_after: Option<i64>,
    pub recipient: Option<String>,
    pub in_response_to: Option<String>,
    pub address: Option<String>,
}

impl SubjectConfirmationData {
    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "SubjectConfirmationData")?;
        Ok(Self {
            not_before: parse_optional_instant(node, ns::attr::NOT_BEFORE)?,
            not_on_or_after: parse_optional_instant(node, ns::attr::NOT_ON_OR_AFTER)?,
            recipient: accessor::optional_attribute(node, "Recipient").map(str::to_owned),
            in_response_to: accessor::optional_attribute(node, "InResponseTo")
                .map(str::to_owned),
            address: accessor::optional_attribute(node, "Address").map(str::to_owned),
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "SubjectConfirmationData");
        e.set_attr_opt(
            ns::attr::NOT_BEFORE,
            self.not_before.map(time::format_instant).as_deref(),
        );
        e.set_attr_opt(
            ns::attr::NOT_ON_OR_AFTER,
            self.not_on_or_after.map(time::format_instant).as_deref(),
        );
        e.set_attr_opt("Recipient", self.recipient.as_deref());
        e.set_attr_opt("InResponseTo", self.in_response_to.as_deref());
        e.set_attr_opt("Address", self.address.as_deref());
        e
    }
}

/// The saml:SubjectConfirmation element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectConfirmation {
    method: String,
    identifier: Option<Identifier>,
    data: Option<SubjectConfirmationData>,
}

impl SubjectConfirmation {
    pub fn new(
        method: &str,
        identifier: Option<Identifier>,
        data: Option<SubjectConfirmationData>,
    ) -> Result<Self> {
        Ok(Self {
            method: accessor::valid_uri(method, "SubjectConfirmation Method")?,
            identifier,
            data,
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    pub fn data(&self) -> Option<&SubjectConfirmationData> {
        self.data.as_ref()
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "SubjectConfirmation")?;

        let method = accessor::required_attribute(node, ns::attr::METHOD)?;
        let identifier = Identifier::parse_choice(node, "saml:SubjectConfirmation")?;

        let data_nodes = accessor::children(node, ns::SAML, "SubjectConfirmationData");
        let data = accessor::at_most_one(
            data_nodes,
            "saml:SubjectConfirmation",
            "saml:SubjectConfirmationData",
        )?
        .map(SubjectConfirmationData::from_xml)
        .transpose()?;

        Self::new(method, identifier, data)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "SubjectConfirmation");
        e.set_attr(ns::attr::METHOD, &self.method);
        if let Some(identifier) = &self.identifier {
            identifier.write_into(&mut e);
        }
        e.push_opt(self.data.as_ref().map(SubjectConfirmationData::to_xml));
        e
    }
}

/// The saml:Subject element.
///
/// Schema rule: an identifier, one or more SubjectConfirmations, or
/// both; an entirely empty Subject is meaningless and rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    identifier: Option<Identifier>,
    confirmations: Vec<SubjectConfirmation>,
}

impl Subject {
    pub fn new(
        identifier: Option<Identifier>,
        confirmations: Vec<SubjectConfirmation>,
    ) -> Result<Self> {
        if identifier.is_none() && confirmations.is_empty() {
            return Err(Error::MissingElement(
                "<saml:Subject> needs an identifier or at least one SubjectConfirmation".into(),
            ));
        }
        Ok(Self {
            identifier,
            confirmations,
        })
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    pub fn confirmations(&self) -> &[SubjectConfirmation] {
        &self.confirmations
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "Subject")?;

        let identifier = Identifier::parse_choice(node, "saml:Subject")?;
        let confirmations = accessor::children(node, ns::SAML, "SubjectConfirmation")
            .into_iter()
            .map(SubjectConfirmation::from_xml)
            .collect::<Result<Vec<_>>>()?;

        Self::new(identifier, confirmations)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "Subject");
        if let Some(identifier) = &self.identifier {
            identifier.write_into(&mut e);
        }
        for confirmation in &self.confirmations {
            e.push(confirmation.to_xml());
        }
        e
    }
}

fn parse_optional_instant(node: roxmltree::Node<'_, '_>, attr: &str) -> Result<Option<i64>> {
    accessor::optional_attribute(node, attr)
        .map(time::parse_instant)
        .transpose()
}
