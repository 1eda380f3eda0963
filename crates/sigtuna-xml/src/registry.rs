#![forbid(unsafe_code)]

//! Extension point registry.
//!
//! Maps a resolved `xsi:type` key to a handler. The hosting application
//! populates the registry before any parse happens and passes it by
//! reference into the parse entry points that need it; the library never
//! mutates it. There are no default entries.

use sigtuna_core::{ns, Error, Result, TypeKey};
use std::collections::HashMap;

/// A registry of `xsi:type` handlers for one extension point.
///
/// `H` is the handler type of that extension point (typically a function
/// or boxed closure producing the abstract base type).
pub struct ExtensionRegistry<H> {
    handlers: HashMap<TypeKey, H>,
}

impl<H> ExtensionRegistry<H> {
    /// An empty registry; polymorphic parses fall back to the lossless
    /// unknown variant for every type.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a type key. A later registration for the
    /// same key replaces the earlier one.
    pub fn register(&mut self, key: TypeKey, handler: H) {
        self.handlers.insert(key, handler);
    }

    /// Look up the handler for a resolved type key.
    pub fn resolve(&self, key: &TypeKey) -> Option<&H> {
        self.handlers.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}

impl<H> Default for ExtensionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the `xsi:type` attribute off a node and resolve its prefix
/// against the node's in-scope namespace declarations.
///
/// Absence is a schema violation at the extension points that call this;
/// a malformed QName likewise.
pub fn resolve_xsi_type(node: roxmltree::Node<'_, '_>) -> Result<TypeKey> {
    let raw = node.attribute((ns::XSI, ns::attr::TYPE)).ok_or_else(|| {
        Error::SchemaViolation(format!(
            "missing required xsi:type on <{}>",
            node.tag_name().name()
        ))
    })?;
    TypeKey::resolve(raw, |prefix| match prefix {
        Some(p) => node.lookup_namespace_uri(Some(p)),
        None => node.lookup_namespace_uri(None),
    })
}
