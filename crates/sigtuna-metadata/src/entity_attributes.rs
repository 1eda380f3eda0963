#![forbid(unsafe_code)]

//! mdattr:EntityAttributes, the container federations use to attach
//! saml:Attribute values (or whole signed assertions) to an entity's
//! metadata.

use sigtuna_assertion::{Assertion, Attribute};
use sigtuna_core::{ns, Error, Result};
use sigtuna_xml::{accessor, Element};

/// A child of EntityAttributes, kept in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityAttributesChild {
    Attribute(Attribute),
    Assertion(Box<Assertion>),
}

/// The mdattr:EntityAttributes element. At least one child is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityAttributes {
    children: Vec<EntityAttributesChild>,
}

impl EntityAttributes {
    pub fn new(children: Vec<EntityAttributesChild>) -> Result<Self> {
        Ok(Self {
            children: accessor::at_least_one(
                children,
                "mdattr:EntityAttributes",
                "saml:Attribute or saml:Assertion",
            )?,
        })
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.children
            .push(EntityAttributesChild::Attribute(attribute));
        self
    }

    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.children
            .push(EntityAttributesChild::Assertion(Box::new(assertion)));
        self
    }

    pub fn children(&self) -> &[EntityAttributesChild] {
        &self.children
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MDATTR, "EntityAttributes")?;
        let children = accessor::element_children(node)
            .into_iter()
            .map(|child| {
                let tag = child.tag_name();
                match (tag.namespace().unwrap_or(""), tag.name()) {
                    (ns::SAML, "Attribute") => {
                        Attribute::from_xml(child).map(EntityAttributesChild::Attribute)
                    }
                    (ns::SAML, "Assertion") => Assertion::from_xml(child)
                        .map(|a| EntityAttributesChild::Assertion(Box::new(a))),
                    (found_ns, found) => Err(Error::InvalidElement(format!(
                        "{{{found_ns}}}{found} is not allowed in <mdattr:EntityAttributes>"
                    ))),
                }
            })
            .collect::<Result<_>>()?;
        Self::new(children)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MDATTR, ns::MDATTR, "EntityAttributes");
        for child in &self.children {
            match child {
                EntityAttributesChild::Attribute(attribute) => e.push(attribute.to_xml()),
                EntityAttributesChild::Assertion(assertion) => e.push(assertion.to_xml()),
            }
        }
        e
    }
}
