#![forbid(unsafe_code)]

//! Evidence and assertion references.

use crate::assertion::{Assertion, EncryptedAssertion};
use sigtuna_core::{ns, Result};
use sigtuna_xml::{accessor, Element};

/// One item of evidence, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceItem {
    AssertionIdRef(String),
    AssertionUriRef(String),
    Assertion(Box<Assertion>),
    EncryptedAssertion(EncryptedAssertion),
}

/// The saml:Evidence element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    items: Vec<EvidenceItem>,
}

impl Evidence {
    pub fn new(items: Vec<EvidenceItem>) -> Result<Self> {
        let items = accessor::at_least_one(items, "saml:Evidence", "evidence item")?;
        Ok(Self { items })
    }

    pub fn items(&self) -> &[EvidenceItem] {
        &self.items
    }

    pub fn assertions(&self) -> impl Iterator<Item = &Assertion> {
        self.items.iter().filter_map(|item| match item {
            EvidenceItem::Assertion(a) => Some(a.as_ref()),
            _ => None,
        })
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "Evidence")?;

        let mut items = Vec::new();
        for child in accessor::element_children(node) {
            let tag = child.tag_name();
            if tag.namespace().unwrap_or("") != ns::SAML {
                continue;
            }
            match tag.name() {
                "AssertionIDRef" => items.push(EvidenceItem::AssertionIdRef(
                    accessor::non_empty(&accessor::text_content(child), "saml:AssertionIDRef")?,
                )),
                "AssertionURIRef" => items.push(EvidenceItem::AssertionUriRef(
                    accessor::valid_uri(&accessor::text_content(child), "saml:AssertionURIRef")?,
                )),
                "Assertion" => items.push(EvidenceItem::Assertion(Box::new(
                    Assertion::from_xml(child)?,
                ))),
                "EncryptedAssertion" => items.push(EvidenceItem::EncryptedAssertion(
                    EncryptedAssertion::from_xml(child)?,
                )),
                _ => {}
            }
        }

        Self::new(items)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "Evidence");
        for item in &self.items {
            match item {
                EvidenceItem::AssertionIdRef(id) => {
                    let mut r = Element::new(ns::prefix::SAML, ns::SAML, "AssertionIDRef");
                    r.push_text(id);
                    e.push(r);
                }
                EvidenceItem::AssertionUriRef(uri) => {
                    let mut r = Element::new(ns::prefix::SAML, ns::SAML, "AssertionURIRef");
                    r.push_text(uri);
                    e.push(r);
                }
                EvidenceItem::Assertion(a) => e.push(a.to_xml()),
                EvidenceItem::EncryptedAssertion(a) => e.push(a.to_xml()),
            }
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_core::Error;

    #[test]
    fn test_round_trip_mixed_refs() {
        let evidence = Evidence::new(vec![
            EvidenceItem::AssertionIdRef("_ref1".into()),
            EvidenceItem::AssertionUriRef("https://idp.example.org/assertions/1".into()),
        ])
        .unwrap();
        let xml = evidence.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(Evidence::from_xml(doc.root_element()).unwrap(), evidence);
    }

    #[test]
    fn test_empty_evidence_rejected() {
        assert!(matches!(
            Evidence::new(vec![]),
            Err(Error::MissingElement(_))
        ));
    }
}
