#![forbid(unsafe_code)]

//! XML binding layer for the Sigtuna SAML 2.0 library.
//!
//! Parsing reads `roxmltree` nodes through the [`accessor`] helpers;
//! serialization builds an owned [`Element`] tree. [`Chunk`] preserves
//! opaque subtrees verbatim and [`registry::ExtensionRegistry`] resolves
//! `xsi:type` substitution at the polymorphic parse points.

pub mod accessor;
pub mod chunk;
pub mod document;
pub mod element;
pub mod escape;
pub mod registry;

pub use chunk::Chunk;
pub use document::SamlDocument;
pub use element::Element;
pub use registry::ExtensionRegistry;
