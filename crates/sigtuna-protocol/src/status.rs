#![forbid(unsafe_code)]

//! samlp:Status with its nested StatusCode chain.

use sigtuna_core::{ns, Result};
use sigtuna_xml::{accessor, Chunk, Element};

/// A samlp:StatusCode. Subcodes nest recursively; responders use the
/// second level to refine the top-level result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCode {
    value: String,
    subcode: Option<Box<StatusCode>>,
}

impl StatusCode {
    pub fn new(value: &str) -> Result<Self> {
        Ok(Self {
            value: accessor::valid_uri(value, "StatusCode Value")?,
            subcode: None,
        })
    }

    pub fn with_subcode(mut self, subcode: StatusCode) -> Self {
        self.subcode = Some(Box::new(subcode));
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn subcode(&self) -> Option<&StatusCode> {
        self.subcode.as_deref()
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "StatusCode")?;
        let value = accessor::required_attribute(node, "Value")?;
        let subcode = accessor::at_most_one(
            accessor::children(node, ns::SAMLP, "StatusCode"),
            "samlp:StatusCode",
            "samlp:StatusCode",
        )?
        .map(StatusCode::from_xml)
        .transpose()?;
        Ok(Self {
            value: accessor::valid_uri(value, "StatusCode Value")?,
            subcode: subcode.map(Box::new),
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "StatusCode");
        e.set_attr("Value", &self.value);
        e.push_opt(self.subcode.as_ref().map(|s| s.to_xml()));
        e
    }
}

/// The samlp:Status element of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: StatusCode,
    message: Option<String>,
    detail: Vec<Chunk>,
}

impl Status {
    pub fn new(code: StatusCode) -> Self {
        Self {
            code,
            message: None,
            detail: Vec::new(),
        }
    }

    /// Success shortcut.
    pub fn success() -> Self {
        Self {
            code: StatusCode {
                value: ns::STATUS_SUCCESS.to_owned(),
                subcode: None,
            },
            message: None,
            detail: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }

    pub fn code(&self) -> &StatusCode {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn detail(&self) -> &[Chunk] {
        &self.detail
    }

    pub fn is_success(&self) -> bool {
        self.code.value == ns::STATUS_SUCCESS
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "Status")?;

        let code = accessor::exactly_one(
            accessor::children(node, ns::SAMLP, "StatusCode"),
            "samlp:Status",
            "samlp:StatusCode",
        )
        .and_then(StatusCode::from_xml)?;

        let message = accessor::at_most_one(
            accessor::children(node, ns::SAMLP, "StatusMessage"),
            "samlp:Status",
            "samlp:StatusMessage",
        )?
        .map(accessor::text_content);

        let detail = accessor::at_most_one(
            accessor::children(node, ns::SAMLP, "StatusDetail"),
            "samlp:Status",
            "samlp:StatusDetail",
        )?
        .map(|d| {
            accessor::element_children(d)
                .into_iter()
                .map(Chunk::from_node)
                .collect()
        })
        .unwrap_or_default();

        Ok(Self {
            code,
            message,
            detail,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "Status");
        e.push(self.code.to_xml());
        if let Some(message) = &self.message {
            let mut m = Element::new(ns::prefix::SAMLP, ns::SAMLP, "StatusMessage");
            m.push_text(message);
            e.push(m);
        }
        if !self.detail.is_empty() {
            let mut d = Element::new(ns::prefix::SAMLP, ns::SAMLP, "StatusDetail");
            for chunk in &self.detail {
                chunk.write_into(&mut d);
            }
            e.push(d);
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_core::Error;

    #[test]
    fn test_success_round_trip() {
        let status = Status::success();
        assert!(status.is_success());
        let xml = status.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(Status::from_xml(doc.root_element()).unwrap(), status);
    }

    #[test]
    fn test_nested_subcode_and_message() {
        let status = Status::new(
            StatusCode::new("urn:oasis:names:tc:SAML:2.0:status:Requester")
                .unwrap()
                .with_subcode(
                    StatusCode::new("urn:oasis:names:tc:SAML:2.0:status:RequestDenied").unwrap(),
                ),
        )
        .with_message("policy forbids this request");

        let xml = status.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let parsed = Status::from_xml(doc.root_element()).unwrap();
        assert!(!parsed.is_success());
        assert_eq!(
            parsed.code().subcode().unwrap().value(),
            "urn:oasis:names:tc:SAML:2.0:status:RequestDenied"
        );
        assert_eq!(parsed.message(), Some("policy forbids this request"));
    }

    #[test]
    fn test_status_without_code_rejected() {
        let xml = r#"<samlp:Status xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol"/>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            Status::from_xml(doc.root_element()),
            Err(Error::MissingElement(_))
        ));
    }
}
