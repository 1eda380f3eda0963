#![forbid(unsafe_code)]

//! The ecp:RequestAuthenticated SOAP header block.

use crate::soap;
use sigtuna_core::{ns, Result};
use sigtuna_xml::{accessor, Element};

/// The ecp:RequestAuthenticated element: an empty marker block telling
/// the client the provider authenticated the request. mustUnderstand is
/// optional here, the profile lets a client ignore the block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestAuthenticated {
    must_understand: Option<bool>,
}

impl RequestAuthenticated {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_must_understand(mut self, value: bool) -> Self {
        self.must_understand = Some(value);
        self
    }

    pub fn must_understand(&self) -> Option<bool> {
        self.must_understand
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::ECP, "RequestAuthenticated")?;
        soap::check_actor(node)?;
        Ok(Self {
            must_understand: soap::optional_must_understand(node)?,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::ECP, ns::ECP, "RequestAuthenticated");
        if let Some(mu) = self.must_understand {
            e.set_attr_ns(
                ns::prefix::SOAP,
                ns::SOAP,
                ns::attr::MUST_UNDERSTAND,
                if mu { "1" } else { "0" },
            );
        }
        e.set_attr_ns(ns::prefix::SOAP, ns::SOAP, ns::attr::ACTOR, ns::SOAP_ACTOR_NEXT);
        e
    }
}
