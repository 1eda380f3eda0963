#![forbid(unsafe_code)]

//! Qualified names and `xsi:type` keys.

use crate::error::{Error, Result};

/// A resolved XML qualified name: namespace URI plus local name.
///
/// Used both as the fixed name of a typed element and as the key an
/// `xsi:type` attribute resolves to for extension lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub namespace: String,
    pub local: String,
}

impl TypeKey {
    pub fn new(namespace: &str, local: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            local: local.to_owned(),
        }
    }

    /// Resolve a raw `xsi:type` value (`prefix:Local` or `Local`) against
    /// a prefix → namespace lookup supplied by the node's in-scope
    /// namespace declarations.
    pub fn resolve<'a, F>(qname: &str, lookup: F) -> Result<Self>
    where
        F: Fn(Option<&str>) -> Option<&'a str>,
    {
        let (prefix, local) = match qname.split_once(':') {
            Some((p, l)) => (Some(p), l),
            None => (None, qname),
        };

        if local.is_empty() || prefix.map_or(false, str::is_empty) || local.contains(':') {
            return Err(Error::SchemaViolation(format!(
                "'{qname}' is not a valid QName"
            )));
        }

        let namespace = lookup(prefix).unwrap_or("");
        Ok(Self::new(namespace, local))
    }
}

impl std::fmt::Display for TypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}
