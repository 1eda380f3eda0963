#![forbid(unsafe_code)]

//! Typed `samlp:` (protocol namespace) messages.
//!
//! Every message shares the [`MessageFields`] envelope: ID, Version,
//! IssueInstant, optional Destination/Consent, optional Issuer and
//! Extensions, and a signature slot. Version checks run before anything
//! else so that mismatched peers get a precise rejection.

pub mod authn_request;
pub mod extensions;
pub mod message;
pub mod queries;
pub mod response;
pub mod status;

pub use authn_request::{
    AuthnRequest, ContextComparison, IdpEntry, IdpList, NameIdPolicy, RequestedAuthnContext,
    ResponseTarget, Scoping,
};
pub use extensions::Extensions;
pub use message::{check_version, MessageFields};
pub use queries::{AttributeQuery, AuthnQuery, SubjectQuery};
pub use response::{Response, ResponseAssertion};
pub use status::{Status, StatusCode};
