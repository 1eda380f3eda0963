#![forbid(unsafe_code)]

//! SOAP 1.1 header attribute rules shared by the ECP header blocks.
//!
//! Every ECP header block travels as a SOAP header and must carry the
//! fixed "next" actor; `mustUnderstand` is "1" where the profile makes
//! the block mandatory to process.

use sigtuna_core::{ns, Error, Result};
use sigtuna_xml::{accessor, Element};

/// Check the required SOAP-ENV:actor attribute against the fixed "next"
/// actor URI.
pub fn check_actor(node: roxmltree::Node<'_, '_>) -> Result<()> {
    let actor = accessor::required_attribute_ns(node, ns::SOAP, ns::attr::ACTOR)?;
    if actor == ns::SOAP_ACTOR_NEXT {
        Ok(())
    } else {
        Err(Error::ProtocolViolation(format!(
            "SOAP-ENV:actor must be '{}', found '{actor}'",
            ns::SOAP_ACTOR_NEXT
        )))
    }
}

/// Check a required SOAP-ENV:mustUnderstand attribute, which must be "1".
pub fn check_must_understand(node: roxmltree::Node<'_, '_>) -> Result<()> {
    let value = accessor::required_attribute_ns(node, ns::SOAP, ns::attr::MUST_UNDERSTAND)?;
    if value == "1" {
        Ok(())
    } else {
        Err(Error::ProtocolViolation(format!(
            "SOAP-ENV:mustUnderstand must be '1', found '{value}'"
        )))
    }
}

/// Check an optional SOAP-ENV:mustUnderstand attribute; when present it
/// must be the xs:boolean canonical "0" or "1".
pub fn optional_must_understand(node: roxmltree::Node<'_, '_>) -> Result<Option<bool>> {
    match accessor::optional_attribute_ns(node, ns::SOAP, ns::attr::MUST_UNDERSTAND) {
        None => Ok(None),
        Some("1") => Ok(Some(true)),
        Some("0") => Ok(Some(false)),
        Some(other) => Err(Error::ProtocolViolation(format!(
            "SOAP-ENV:mustUnderstand must be '0' or '1', found '{other}'"
        ))),
    }
}

/// Emit the fixed SOAP header attributes onto an ECP header element.
pub fn write_header_attrs(e: &mut Element, must_understand: &str) {
    e.set_attr_ns(
        ns::prefix::SOAP,
        ns::SOAP,
        ns::attr::MUST_UNDERSTAND,
        must_understand,
    );
    e.set_attr_ns(ns::prefix::SOAP, ns::SOAP, ns::attr::ACTOR, ns::SOAP_ACTOR_NEXT);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> roxmltree::Document<'_> {
        roxmltree::Document::parse(xml).unwrap()
    }

    #[test]
    fn test_actor_must_be_next() {
        let doc = parse(concat!(
            r#"<e xmlns:S="http://schemas.xmlsoap.org/soap/envelope/" "#,
            r#"S:actor="http://schemas.xmlsoap.org/soap/actor/other"/>"#
        ));
        assert!(matches!(
            check_actor(doc.root_element()),
            Err(Error::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_missing_actor_is_missing_attribute() {
        let doc = parse("<e/>");
        assert!(matches!(
            check_actor(doc.root_element()),
            Err(Error::MissingAttribute(_))
        ));
    }

    #[test]
    fn test_optional_must_understand_values() {
        let doc = parse(concat!(
            r#"<e xmlns:S="http://schemas.xmlsoap.org/soap/envelope/" S:mustUnderstand="0"/>"#
        ));
        assert_eq!(
            optional_must_understand(doc.root_element()).unwrap(),
            Some(false)
        );

        let doc = parse(concat!(
            r#"<e xmlns:S="http://schemas.xmlsoap.org/soap/envelope/" S:mustUnderstand="true"/>"#
        ));
        assert!(matches!(
            optional_must_understand(doc.root_element()),
            Err(Error::ProtocolViolation(_))
        ));

        let doc = parse("<e/>");
        assert_eq!(optional_must_understand(doc.root_element()).unwrap(), None);
    }
}
