#![forbid(unsafe_code)]

//! Typed `saml:` (assertion namespace) elements.
//!
//! Each element type carries its own `from_xml`/`to_xml` pair and
//! enforces its SAML-schema invariants in the constructor, so a
//! programmatically built object gets the same guarantees as a parsed
//! one.

pub mod assertion;
pub mod attribute;
pub mod conditions;
pub mod evidence;
pub mod issuer;
pub mod nameid;
pub mod statements;
pub mod subject;

pub use assertion::{Assertion, EncryptedAssertion, Statement};
pub use attribute::{Attribute, AttributeStatement, EncryptedAttribute};
pub use conditions::{AudienceRestriction, Conditions, ProxyRestriction};
pub use evidence::{Evidence, EvidenceItem};
pub use issuer::Issuer;
pub use nameid::{BaseId, EncryptedId, Identifier, NameId, NameIdType};
pub use statements::{AuthnContext, AuthnStatement, SubjectLocality};
pub use subject::{Subject, SubjectConfirmation, SubjectConfirmationData};
