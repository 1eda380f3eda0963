#![forbid(unsafe_code)]

//! Typed ECP (Enhanced Client or Proxy) SOAP header blocks.

pub mod relay_state;
pub mod request_authenticated;
pub mod soap;
pub mod subject_confirmation;

pub use relay_state::RelayState;
pub use request_authenticated::RequestAuthenticated;
pub use subject_confirmation::SubjectConfirmation;
