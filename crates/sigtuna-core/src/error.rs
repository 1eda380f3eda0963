#![forbid(unsafe_code)]

/// Errors produced by the Sigtuna SAML 2.0 library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("unexpected element: {0}")]
    InvalidElement(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("too many child elements: {0}")]
    TooManyElements(String),

    #[error("schema violation: {0}")]
    SchemaViolation(String),

    #[error("SAML protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("request version too high: {0}")]
    RequestVersionTooHigh(String),

    #[error("request version too low: {0}")]
    RequestVersionTooLow(String),

    #[error("security violation: {0}")]
    SecurityViolation(String),

    #[error("base64 decode error: {0}")]
    Base64(String),

    #[error("cryptographic backend error: {0}")]
    Crypto(String),
}

pub type Result<T> = std::result::Result<T, Error>;
