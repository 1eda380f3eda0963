#![forbid(unsafe_code)]

//! Typed access to attributes and child elements of a parsed node.
//!
//! Every `from_xml` implementation goes through these helpers so that
//! missing attributes, missing children and cardinality violations all
//! fail with the same error kinds and name the offending qualified names.

use sigtuna_core::{ns, Error, Result};

/// Check that a node carries the expected namespace and local name.
pub fn expect_element(node: roxmltree::Node<'_, '_>, ns_uri: &str, local: &str) -> Result<()> {
    let tag = node.tag_name();
    if tag.name() == local && tag.namespace().unwrap_or("") == ns_uri {
        Ok(())
    } else {
        Err(Error::InvalidElement(format!(
            "expected {{{ns_uri}}}{local}, found {{{found_ns}}}{found}",
            found_ns = tag.namespace().unwrap_or(""),
            found = tag.name()
        )))
    }
}

/// Get a required un-namespaced attribute.
pub fn required_attribute<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        Error::MissingAttribute(format!(
            "missing {name} attribute on <{}>",
            display_name(node)
        ))
    })
}

/// Get an optional un-namespaced attribute.
pub fn optional_attribute<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

/// Get a required namespaced attribute (e.g. SOAP-ENV:actor, xsi:type).
pub fn required_attribute_ns<'a>(
    node: roxmltree::Node<'a, '_>,
    ns_uri: &str,
    name: &str,
) -> Result<&'a str> {
    node.attribute((ns_uri, name)).ok_or_else(|| {
        let prefix = prefix_for(node, ns_uri);
        Error::MissingAttribute(format!(
            "missing {prefix}{name} attribute in <{}>",
            display_name(node)
        ))
    })
}

/// Get an optional namespaced attribute.
pub fn optional_attribute_ns<'a>(
    node: roxmltree::Node<'a, '_>,
    ns_uri: &str,
    name: &str,
) -> Option<&'a str> {
    node.attribute((ns_uri, name))
}

/// Direct child elements matching a qualified name, in document order.
pub fn children<'a>(
    parent: roxmltree::Node<'a, 'a>,
    ns_uri: &str,
    local: &str,
) -> Vec<roxmltree::Node<'a, 'a>> {
    parent
        .children()
        .filter(|n| {
            n.is_element()
                && n.tag_name().name() == local
                && n.tag_name().namespace().unwrap_or("") == ns_uri
        })
        .collect()
}

/// All direct child elements, in document order.
pub fn element_children<'a>(parent: roxmltree::Node<'a, 'a>) -> Vec<roxmltree::Node<'a, 'a>> {
    parent.children().filter(|n| n.is_element()).collect()
}

/// The trimmed text content of a node.
pub fn text_content(node: roxmltree::Node<'_, '_>) -> String {
    node.text().unwrap_or("").trim().to_owned()
}

/// Enforce "at most one" over already-parsed children.
pub fn at_most_one<T>(mut items: Vec<T>, parent: &str, child: &str) -> Result<Option<T>> {
    match items.len() {
        0 => Ok(None),
        1 => Ok(items.pop()),
        n => Err(Error::TooManyElements(format!(
            "{n} <{child}> elements in <{parent}>, at most one allowed"
        ))),
    }
}

/// Enforce "exactly one" over already-parsed children.
pub fn exactly_one<T>(items: Vec<T>, parent: &str, child: &str) -> Result<T> {
    at_most_one(items, parent, child)?.ok_or_else(|| {
        Error::MissingElement(format!("missing <{child}> in <{parent}>"))
    })
}

/// Enforce "at least one" over already-parsed children.
pub fn at_least_one<T>(items: Vec<T>, parent: &str, child: &str) -> Result<Vec<T>> {
    if items.is_empty() {
        Err(Error::MissingElement(format!(
            "missing <{child}> in <{parent}>, at least one required"
        )))
    } else {
        Ok(items)
    }
}

/// A non-empty string, or a schema violation naming the context.
pub fn non_empty(value: &str, context: &str) -> Result<String> {
    if value.is_empty() {
        Err(Error::SchemaViolation(format!("{context} must not be empty")))
    } else {
        Ok(value.to_owned())
    }
}

/// A non-empty `scheme:`-shaped URI, or a schema violation.
pub fn valid_uri(value: &str, context: &str) -> Result<String> {
    let looks_like_uri = value
        .split_once(':')
        .map_or(false, |(scheme, _)| {
            !scheme.is_empty()
                && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        });
    if looks_like_uri {
        Ok(value.to_owned())
    } else {
        Err(Error::SchemaViolation(format!(
            "{context}: '{value}' is not a valid URI"
        )))
    }
}

/// Parse an xs:boolean lexical value.
pub fn parse_bool(value: &str, context: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(Error::SchemaViolation(format!(
            "{context}: '{other}' is not an xs:boolean"
        ))),
    }
}

fn display_name(node: roxmltree::Node<'_, '_>) -> String {
    let tag = node.tag_name();
    match node.lookup_prefix(tag.namespace().unwrap_or("")) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", tag.name()),
        _ => tag.name().to_owned(),
    }
}

fn prefix_for(node: roxmltree::Node<'_, '_>, ns_uri: &str) -> String {
    // Favor the conventional SOAP prefix in diagnostics when the document
    // does not declare one.
    match node.lookup_prefix(ns_uri) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:"),
        _ if ns_uri == ns::SOAP => format!("{}:", ns::prefix::SOAP),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> roxmltree::Document<'_> {
        roxmltree::Document::parse(xml).unwrap()
    }

    #[test]
    fn test_expect_element() {
        let doc = parse(r#"<a xmlns="urn:x"/>"#);
        assert!(expect_element(doc.root_element(), "urn:x", "a").is_ok());
        assert!(matches!(
            expect_element(doc.root_element(), "urn:x", "b"),
            Err(Error::InvalidElement(_))
        ));
        assert!(matches!(
            expect_element(doc.root_element(), "urn:y", "a"),
            Err(Error::InvalidElement(_))
        ));
    }

    #[test]
    fn test_required_attribute_names_parent() {
        let doc = parse(r#"<saml:Foo xmlns:saml="urn:x"/>"#);
        let err = required_attribute(doc.root_element(), "ID").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ID"), "{msg}");
        assert!(msg.contains("saml:Foo"), "{msg}");
    }

    #[test]
    fn test_cardinality_helpers() {
        assert_eq!(at_most_one(vec![1], "P", "C").unwrap(), Some(1));
        assert!(at_most_one(vec![1, 2], "P", "C").is_err());
        assert_eq!(exactly_one(vec![7], "P", "C").unwrap(), 7);
        assert!(matches!(
            exactly_one::<i32>(vec![], "P", "C"),
            Err(Error::MissingElement(_))
        ));
        assert!(matches!(
            at_least_one::<i32>(vec![], "P", "C"),
            Err(Error::MissingElement(_))
        ));
    }

    #[test]
    fn test_valid_uri() {
        assert!(valid_uri("urn:oasis:names:tc:SAML:2.0:protocol", "x").is_ok());
        assert!(valid_uri("https://example.org/sso", "x").is_ok());
        assert!(valid_uri("", "x").is_err());
        assert!(valid_uri("no-scheme-here", "x").is_err());
    }
}
