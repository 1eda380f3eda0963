#![forbid(unsafe_code)]

//! The ecp:RelayState SOAP header block.

use crate::soap;
use sigtuna_core::{ns, Result};
use sigtuna_xml::{accessor, Element};

/// The ecp:RelayState element: an opaque state token echoed between the
/// service provider and the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayState {
    value: String,
}

impl RelayState {
    pub fn new(value: &str) -> Result<Self> {
        Ok(Self {
            value: accessor::non_empty(value, "ecp:RelayState content")?,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::ECP, "RelayState")?;
        soap::check_must_understand(node)?;
        soap::check_actor(node)?;
        Self::new(&accessor::text_content(node))
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::ECP, ns::ECP, "RelayState");
        soap::write_header_attrs(&mut e, "1");
        e.push_text(&self.value);
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_core::Error;

    const RELAY_STATE: &str = concat!(
        r#"<ecp:RelayState xmlns:ecp="urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp" "#,
        r#"xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" "#,
        r#"SOAP-ENV:mustUnderstand="1" "#,
        r#"SOAP-ENV:actor="http://schemas.xmlsoap.org/soap/actor/next">"#,
        r#"AGDY854379dskssda</ecp:RelayState>"#
    );

    #[test]
    fn test_parse() {
        let doc = roxmltree::Document::parse(RELAY_STATE).unwrap();
        let relay_state = RelayState::from_xml(doc.root_element()).unwrap();
        assert_eq!(relay_state.value(), "AGDY854379dskssda");
    }

    #[test]
    fn test_round_trip() {
        let relay_state = RelayState::new("AGDY854379dskssda").unwrap();
        assert_eq!(relay_state.to_xml().to_string(), RELAY_STATE);
        let doc = roxmltree::Document::parse(RELAY_STATE).unwrap();
        assert_eq!(RelayState::from_xml(doc.root_element()).unwrap(), relay_state);
    }

    #[test]
    fn test_missing_must_understand_names_element() {
        let xml = concat!(
            r#"<ecp:RelayState xmlns:ecp="urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp" "#,
            r#"xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" "#,
            r#"SOAP-ENV:actor="http://schemas.xmlsoap.org/soap/actor/next">"#,
            r#"AGDY854379dskssda</ecp:RelayState>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        let err = RelayState::from_xml(doc.root_element()).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute(_)));
        let msg = err.to_string();
        assert!(msg.contains("mustUnderstand"), "{msg}");
        assert!(msg.contains("ecp:RelayState"), "{msg}");
    }

    #[test]
    fn test_wrong_must_understand_rejected() {
        let xml = RELAY_STATE.replace(r#"mustUnderstand="1""#, r#"mustUnderstand="0""#);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert!(matches!(
            RelayState::from_xml(doc.root_element()),
            Err(Error::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_wrong_actor_rejected() {
        let xml = RELAY_STATE.replace("actor/next", "actor/elsewhere");
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert!(matches!(
            RelayState::from_xml(doc.root_element()),
            Err(Error::ProtocolViolation(_))
        ));
    }
}
