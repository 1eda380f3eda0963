#![forbid(unsafe_code)]

//! Verbatim subtree capture.
//!
//! A [`Chunk`] holds the exact original bytes of one parsed element so
//! that unknown or opaque content (extension elements, unrecognized
//! role descriptors, ds:KeyInfo payloads) round-trips losslessly. The
//! capture is the byte span of the node in the source text, never a
//! re-serialization. Namespace bindings the subtree uses but inherits
//! from an ancestor outside the span are recorded alongside the bytes
//! and re-declared on emission; without them the re-emitted chunk would
//! not be well-formed on its own.

use std::collections::HashSet;

use crate::element::Element;
use crate::escape;
use sigtuna_core::{ns, TypeKey};

/// A losslessly preserved XML subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    qname: TypeKey,
    raw: String,
    /// (prefix, uri) bindings used by the span but declared only on an
    /// ancestor. The default namespace has an empty prefix.
    inherited_ns: Vec<(String, String)>,
}

impl Chunk {
    /// Capture a parsed node verbatim, including its tag, attributes,
    /// in-scope formatting and subtree.
    pub fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let tag = node.tag_name();
        let raw = node.document().input_text()[node.range()].to_owned();

        // Namespace URIs the subtree actually references, through element
        // tags or namespaced attributes.
        let mut used = HashSet::new();
        for n in node.descendants().filter(roxmltree::Node::is_element) {
            if let Some(uri) = n.tag_name().namespace() {
                used.insert(uri);
            }
            for attr in n.attributes() {
                if let Some(uri) = attr.namespace() {
                    used.insert(uri);
                }
            }
        }

        let start_tag = &raw[..start_tag_end(&raw)];
        let inherited_ns = node
            .namespaces()
            .filter(|decl| decl.uri() != ns::XML)
            .filter(|decl| used.contains(decl.uri()))
            .filter(|decl| !declared_in(start_tag, decl.name()))
            .map(|decl| (decl.name().unwrap_or("").to_owned(), decl.uri().to_owned()))
            .collect();

        Self {
            qname: TypeKey::new(tag.namespace().unwrap_or(""), tag.name()),
            raw,
            inherited_ns,
        }
    }

    /// The qualified name of the captured element.
    pub fn qname(&self) -> &TypeKey {
        &self.qname
    }

    /// The captured bytes, exactly as they appeared in the input.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Re-emit the captured subtree into a parent element. When every
    /// binding the span uses was declared within it, this is the raw
    /// bytes unchanged; otherwise the inherited declarations are added
    /// to the start tag.
    pub fn write_into(&self, parent: &mut Element) {
        if self.inherited_ns.is_empty() {
            parent.push_raw(&self.raw);
            return;
        }

        let mut at = start_tag_end(&self.raw);
        if self.raw[..at].ends_with('/') {
            at -= 1;
        }
        let mut out = String::with_capacity(self.raw.len() + 32);
        out.push_str(&self.raw[..at]);
        for (prefix, uri) in &self.inherited_ns {
            if prefix.is_empty() {
                out.push_str(&format!(" xmlns=\"{}\"", escape::escape_attr(uri)));
            } else {
                out.push_str(&format!(" xmlns:{prefix}=\"{}\"", escape::escape_attr(uri)));
            }
        }
        out.push_str(&self.raw[at..]);
        parent.push_raw(&out);
    }
}

/// Byte offset of the `>` (or the `/` of `/>`) closing the start tag,
/// skipping over quoted attribute values.
fn start_tag_end(raw: &str) -> usize {
    let mut quote = None;
    for (i, ch) in raw.char_indices() {
        match (quote, ch) {
            (None, '"') | (None, '\'') => quote = Some(ch),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return i,
            _ => {}
        }
    }
    raw.len()
}

fn declared_in(start_tag: &str, prefix: Option<&str>) -> bool {
    match prefix {
        Some(p) => start_tag.contains(&format!("xmlns:{p}=")),
        None => start_tag.contains("xmlns="),
    }
}
