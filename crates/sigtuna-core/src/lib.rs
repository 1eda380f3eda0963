#![forbid(unsafe_code)]

//! Core types for the Sigtuna SAML 2.0 library.

pub mod error;
pub mod ns;
pub mod qname;
pub mod time;

pub use error::{Error, Result};
pub use qname::TypeKey;
