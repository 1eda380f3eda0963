#![forbid(unsafe_code)]

//! Namespace constants for SAML 2.0 and the schemas it leans on.

/// SAML 2.0 assertion namespace
pub const SAML: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// SAML 2.0 protocol namespace
pub const SAMLP: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// SAML 2.0 metadata namespace
pub const MD: &str = "urn:oasis:names:tc:SAML:2.0:metadata";

/// SAML 2.0 Enhanced Client or Proxy profile namespace
pub const ECP: &str = "urn:oasis:names:tc:SAML:2.0:profiles:SSO:ecp";

/// Metadata extension: user interface information (mdui)
pub const MDUI: &str = "urn:oasis:names:tc:SAML:metadata:ui";

/// Metadata extension: registration and publication information (mdrpi)
pub const MDRPI: &str = "urn:oasis:names:tc:SAML:metadata:rpi";

/// Metadata extension: entity attributes (mdattr)
pub const MDATTR: &str = "urn:oasis:names:tc:SAML:metadata:attribute";

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// XML Encryption namespace
pub const XENC: &str = "http://www.w3.org/2001/04/xmlenc#";

/// XML Schema instance namespace (`xsi:type`)
pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XML Schema namespace
pub const XS: &str = "http://www.w3.org/2001/XMLSchema";

/// SOAP 1.1 envelope namespace
pub const SOAP: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// XML namespace (for `xml:lang`)
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// The fixed SOAP 1.1 "next" actor URI required on ECP SOAP headers.
pub const SOAP_ACTOR_NEXT: &str = "http://schemas.xmlsoap.org/soap/actor/next";

/// The only SAML version this library speaks.
pub const SAML_VERSION: &str = "2.0";

// ── Consent URIs ─────────────────────────────────────────────────────

pub const CONSENT_UNSPECIFIED: &str = "urn:oasis:names:tc:SAML:2.0:consent:unspecified";
pub const CONSENT_OBTAINED: &str = "urn:oasis:names:tc:SAML:2.0:consent:obtained";
pub const CONSENT_PRIOR: &str = "urn:oasis:names:tc:SAML:2.0:consent:prior";
pub const CONSENT_IMPLICIT: &str = "urn:oasis:names:tc:SAML:2.0:consent:current-implicit";
pub const CONSENT_EXPLICIT: &str = "urn:oasis:names:tc:SAML:2.0:consent:current-explicit";
pub const CONSENT_UNAVAILABLE: &str = "urn:oasis:names:tc:SAML:2.0:consent:unavailable";
pub const CONSENT_INAPPLICABLE: &str = "urn:oasis:names:tc:SAML:2.0:consent:inapplicable";

// ── NameID format URIs ───────────────────────────────────────────────

pub const NAMEID_UNSPECIFIED: &str = "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified";
pub const NAMEID_EMAIL_ADDRESS: &str = "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress";
pub const NAMEID_ENTITY: &str = "urn:oasis:names:tc:SAML:2.0:nameid-format:entity";
pub const NAMEID_PERSISTENT: &str = "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent";
pub const NAMEID_TRANSIENT: &str = "urn:oasis:names:tc:SAML:2.0:nameid-format:transient";

// ── Subject confirmation method URIs ─────────────────────────────────

pub const CM_BEARER: &str = "urn:oasis:names:tc:SAML:2.0:cm:bearer";
pub const CM_HOLDER_OF_KEY: &str = "urn:oasis:names:tc:SAML:2.0:cm:holder-of-key";
pub const CM_SENDER_VOUCHES: &str = "urn:oasis:names:tc:SAML:2.0:cm:sender-vouches";

// ── Top-level status code URIs ───────────────────────────────────────

pub const STATUS_SUCCESS: &str = "urn:oasis:names:tc:SAML:2.0:status:Success";
pub const STATUS_REQUESTER: &str = "urn:oasis:names:tc:SAML:2.0:status:Requester";
pub const STATUS_RESPONDER: &str = "urn:oasis:names:tc:SAML:2.0:status:Responder";
pub const STATUS_VERSION_MISMATCH: &str = "urn:oasis:names:tc:SAML:2.0:status:VersionMismatch";

// ── Canonical prefixes used on output ────────────────────────────────

pub mod prefix {
    pub const SAML: &str = "saml";
    pub const SAMLP: &str = "samlp";
    pub const MD: &str = "md";
    pub const MDUI: &str = "mdui";
    pub const MDRPI: &str = "mdrpi";
    pub const MDATTR: &str = "mdattr";
    pub const ECP: &str = "ecp";
    pub const DSIG: &str = "ds";
    pub const XENC: &str = "xenc";
    pub const XSI: &str = "xsi";
    pub const SOAP: &str = "SOAP-ENV";
}

// ── Attribute names shared across element kinds ──────────────────────

pub mod attr {
    pub const ID: &str = "ID";
    pub const VERSION: &str = "Version";
    pub const ISSUE_INSTANT: &str = "IssueInstant";
    pub const DESTINATION: &str = "Destination";
    pub const CONSENT: &str = "Consent";
    pub const FORMAT: &str = "Format";
    pub const METHOD: &str = "Method";
    pub const NOT_BEFORE: &str = "NotBefore";
    pub const NOT_ON_OR_AFTER: &str = "NotOnOrAfter";
    pub const VALID_UNTIL: &str = "validUntil";
    pub const CACHE_DURATION: &str = "cacheDuration";
    pub const TYPE: &str = "type";
    pub const ACTOR: &str = "actor";
    pub const MUST_UNDERSTAND: &str = "mustUnderstand";
    pub const ALGORITHM: &str = "Algorithm";
    pub const LANG: &str = "lang";
}
