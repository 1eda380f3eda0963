#![forbid(unsafe_code)]

//! The samlp:Extensions container.
//!
//! Extension content is arbitrary namespace-qualified XML the schema
//! leaves open. We keep each child as a verbatim chunk so unknown
//! extensions survive a parse/serialize cycle byte for byte.

use sigtuna_core::{ns, Result};
use sigtuna_xml::{accessor, Chunk, Element};

/// The samlp:Extensions element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions {
    chunks: Vec<Chunk>,
}

impl Extensions {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "Extensions")?;
        let chunks = accessor::element_children(node)
            .into_iter()
            .map(Chunk::from_node)
            .collect();
        Ok(Self { chunks })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "Extensions");
        for chunk in &self.chunks {
            chunk.write_into(&mut e);
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_content_preserved_verbatim() {
        let xml = concat!(
            r#"<samlp:Extensions xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol">"#,
            r#"<myns:Widget xmlns:myns="urn:example:ext" mode="fast">ok</myns:Widget>"#,
            r#"</samlp:Extensions>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        let ext = Extensions::from_xml(doc.root_element()).unwrap();
        assert_eq!(ext.chunks().len(), 1);
        assert_eq!(
            ext.chunks()[0].raw(),
            r#"<myns:Widget xmlns:myns="urn:example:ext" mode="fast">ok</myns:Widget>"#
        );
        assert_eq!(ext.to_xml().to_string(), xml);
    }
}
