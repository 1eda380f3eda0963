#![forbid(unsafe_code)]

pub use sigtuna_core as core;
pub use sigtuna_xml as xml;
pub use sigtuna_security as security;
pub use sigtuna_assertion as assertion;
pub use sigtuna_protocol as protocol;
pub use sigtuna_metadata as metadata;
pub use sigtuna_ecp as ecp;
