#![forbid(unsafe_code)]

//! The md:Extensions container, chunk-backed like its samlp: cousin.

use sigtuna_core::{ns, Result};
use sigtuna_xml::{accessor, Chunk, Element};

/// The md:Extensions element.
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
        accessor::expect_element(node, ns::MD, "Extensions")?;
        let chunks = accessor::element_children(node)
            .into_iter()
            .map(Chunk::from_node)
            .collect();
        Ok(Self { chunks })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MD, ns::MD, "Extensions");
        for chunk in &self.chunks {
            chunk.write_into(&mut e);
        }
        e
    }
}
