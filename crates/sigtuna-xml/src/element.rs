#![forbid(unsafe_code)]

//! Owned XML element tree used by every `to_xml` implementation.
//!
//! Typed elements build an [`Element`], append children in schema
//! content-model order and hand the result to their parent. Serialization
//! is deterministic: attributes in insertion order, one `xmlns` declaration
//! per prefix at the outermost element that needs it, nothing emitted for
//! absent optional values.

use crate::escape;

/// Content of an element: nested elements, escaped text, or a verbatim
/// pre-serialized span (used by [`crate::Chunk`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    Text(String),
    Raw(String),
}

/// An owned, writable XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    prefix: String,
    local: String,
    /// (prefix, uri) pairs to declare on this element; "" prefix is the
    /// default namespace.
    ns_decls: Vec<(String, String)>,
    /// (qualified name, value) pairs in insertion order.
    attrs: Vec<(String, String)>,
    children: Vec<Content>,
}

impl Element {
    /// Create an element with a prefixed qualified name, declaring the
    /// prefix → namespace binding on the element itself. The declaration
    /// is suppressed at render time if an ancestor already made it.
    pub fn new(prefix: &str, ns_uri: &str, local: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            local: local.to_owned(),
            ns_decls: vec![(prefix.to_owned(), ns_uri.to_owned())],
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The qualified name as it will be written.
    pub fn qualified_name(&self) -> String {
        if self.prefix.is_empty() {
            self.local.clone()
        } else {
            format!("{}:{}", self.prefix, self.local)
        }
    }

    /// Set an un-namespaced attribute.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.push((name.to_owned(), value.to_owned()));
    }

    /// Set an attribute only when a value is present. Absent optionals
    /// must never surface as empty placeholder attributes.
    pub fn set_attr_opt(&mut self, name: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.set_attr(name, v);
        }
    }

    /// Set a namespaced attribute, declaring its prefix binding here.
    pub fn set_attr_ns(&mut self, prefix: &str, ns_uri: &str, name: &str, value: &str) {
        self.declare_ns(prefix, ns_uri);
        self.attrs.push((format!("{prefix}:{name}"), value.to_owned()));
    }

    /// Declare an extra prefix → namespace binding on this element.
    pub fn declare_ns(&mut self, prefix: &str, ns_uri: &str) {
        let pair = (prefix.to_owned(), ns_uri.to_owned());
        if !self.ns_decls.contains(&pair) {
            self.ns_decls.push(pair);
        }
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(Content::Element(child));
    }

    /// Append a child element when present.
    pub fn push_opt(&mut self, child: Option<Element>) {
        if let Some(c) = child {
            self.push(c);
        }
    }

    /// Append escaped text content.
    pub fn push_text(&mut self, text: &str) {
        self.children.push(Content::Text(text.to_owned()));
    }

    /// Append a verbatim pre-serialized span. The caller guarantees it is
    /// well-formed XML (it came from a parsed document).
    pub fn push_raw(&mut self, raw: &str) {
        self.children.push(Content::Raw(raw.to_owned()));
    }

    /// Whether this element has any content.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Serialize to a string.
    pub fn to_string(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, &mut Vec::new());
        out
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    fn render(&self, out: &mut String, in_scope: &mut Vec<(String, String)>) {
        out.push('<');
        out.push_str(&self.qualified_name());

        let mut added = 0;
        for (prefix, uri) in &self.ns_decls {
            if uri.is_empty() {
                continue;
            }
            if in_scope.iter().rev().find(|(p, _)| p == prefix).map(|(_, u)| u.as_str())
                == Some(uri.as_str())
            {
                continue;
            }
            if prefix.is_empty() {
                out.push_str(&format!(" xmlns=\"{}\"", escape::escape_attr(uri)));
            } else {
                out.push_str(&format!(" xmlns:{prefix}=\"{}\"", escape::escape_attr(uri)));
            }
            in_scope.push((prefix.clone(), uri.clone()));
            added += 1;
        }

        for (name, value) in &self.attrs {
            out.push_str(&format!(" {name}=\"{}\"", escape::escape_attr(value)));
        }

        if self.children.is_empty() {
            out.push_str("/>");
        } else {
            out.push('>');
            for child in &self.children {
                match child {
                    Content::Element(e) => e.render(out, in_scope),
                    Content::Text(t) => out.push_str(&escape::escape_text(t)),
                    Content::Raw(r) => out.push_str(r),
                }
            }
            out.push_str("</");
            out.push_str(&self.qualified_name());
            out.push('>');
        }

        in_scope.truncate(in_scope.len() - added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_ns_declared_once() {
        let mut root = Element::new("saml", "urn:a", "Assertion");
        let child = Element::new("saml", "urn:a", "Issuer");
        root.push(child);
        assert_eq!(
            root.to_string(),
            r#"<saml:Assertion xmlns:saml="urn:a"><saml:Issuer/></saml:Assertion>"#
        );
    }

    #[test]
    fn test_sibling_scopes_do_not_leak() {
        let mut root = Element::new("p", "urn:p", "Root");
        root.push(Element::new("a", "urn:a", "First"));
        root.push(Element::new("a", "urn:a", "Second"));
        assert_eq!(
            root.to_string(),
            concat!(
                r#"<p:Root xmlns:p="urn:p">"#,
                r#"<a:First xmlns:a="urn:a"/>"#,
                r#"<a:Second xmlns:a="urn:a"/>"#,
                r#"</p:Root>"#
            )
        );
    }

    #[test]
    fn test_attrs_in_insertion_order() {
        let mut e = Element::new("x", "urn:x", "E");
        e.set_attr("B", "2");
        e.set_attr("A", "1");
        assert_eq!(e.to_string(), r#"<x:E xmlns:x="urn:x" B="2" A="1"/>"#);
    }

    #[test]
    fn test_optional_attr_omitted() {
        let mut e = Element::new("x", "urn:x", "E");
        e.set_attr_opt("A", None);
        e.set_attr_opt("B", Some("b"));
        assert_eq!(e.to_string(), r#"<x:E xmlns:x="urn:x" B="b"/>"#);
    }

    #[test]
    fn test_text_escaped() {
        let mut e = Element::new("x", "urn:x", "E");
        e.push_text("a<b&c");
        assert_eq!(e.to_string(), r#"<x:E xmlns:x="urn:x">a&lt;b&amp;c</x:E>"#);
    }
}
