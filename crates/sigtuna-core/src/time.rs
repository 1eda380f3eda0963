#![forbid(unsafe_code)]

//! xsd:dateTime handling for SAML timestamps.
//!
//! SAML 2.0 (and the XML Schema it builds on) requires all timestamps to be
//! expressed in UTC with a literal `Z` suffix. Anything else — a numeric
//! offset, a missing suffix, a malformed date — is a protocol violation,
//! not a parse error we can shrug off. Internally timestamps are plain
//! Unix epoch seconds.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parse an xsd:dateTime string with a mandatory `Z` (Zulu) suffix into
/// Unix epoch seconds. Fractional seconds are accepted and truncated.
pub fn parse_instant(value: &str) -> Result<i64> {
    let stripped = value.strip_suffix('Z').ok_or_else(|| {
        Error::ProtocolViolation(format!(
            "timestamp '{value}' is not expressed in UTC (Zulu); a trailing 'Z' is required"
        ))
    })?;

    let naive = NaiveDateTime::parse_from_str(stripped, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| Error::ProtocolViolation(format!("malformed xsd:dateTime '{value}': {e}")))?;

    Ok(naive.and_utc().timestamp())
}

/// Format Unix epoch seconds as an xsd:dateTime in UTC, seconds precision.
pub fn format_instant(epoch: i64) -> String {
    let dt: DateTime<Utc> = Utc
        .timestamp_opt(epoch, 0)
        .single()
        .unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap());
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Shallow syntax check for an xsd:duration (`cacheDuration` and friends).
///
/// The value stays an opaque string; only the leading `P` designator
/// (optionally negated) is checked.
pub fn check_duration(value: &str) -> Result<()> {
    let body = value.strip_prefix('-').unwrap_or(value);
    if body.len() >= 2 && body.starts_with('P') {
        Ok(())
    } else {
        Err(Error::SchemaViolation(format!(
            "'{value}' is not an xsd:duration"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zulu() {
        assert_eq!(parse_instant("1970-01-01T00:00:00Z").unwrap(), 0);
        assert_eq!(parse_instant("2004-12-05T09:21:59Z").unwrap(), 1102238519);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        assert_eq!(
            parse_instant("2004-12-05T09:21:59.123Z").unwrap(),
            1102238519
        );
    }

    #[test]
    fn test_reject_non_zulu() {
        assert!(matches!(
            parse_instant("2004-12-05T09:21:59+00:00"),
            Err(Error::ProtocolViolation(_))
        ));
        assert!(matches!(
            parse_instant("2004-12-05T09:21:59"),
            Err(Error::ProtocolViolation(_))
        ));
        assert!(matches!(
            parse_instant("not-a-date"),
            Err(Error::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        let s = "2021-06-12T14:30:00Z";
        let epoch = parse_instant(s).unwrap();
        assert_eq!(format_instant(epoch), s);
    }

    #[test]
    fn test_duration_syntax() {
        assert!(check_duration("PT5M").is_ok());
        assert!(check_duration("P1Y2M3DT4H5M6S").is_ok());
        assert!(check_duration("-P1D").is_ok());
        assert!(check_duration("5 minutes").is_err());
        assert!(check_duration("P").is_err());
    }
}
