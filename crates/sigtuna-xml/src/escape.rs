#![forbid(unsafe_code)]

//! Character escaping for serialized output.
//!
//! The serializer writes character data and attribute values straight
//! into the output string, so anything syntactically active must become
//! a character reference here. Attribute values additionally escape the
//! whitespace characters that attribute-value normalization would
//! otherwise fold into spaces on the next parse.

fn escape_with(s: &str, replace: impl Fn(char) -> Option<&'static str>) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match replace(ch) {
            Some(reference) => out.push_str(reference),
            None => out.push(ch),
        }
    }
    out
}

/// Escape character data. `>` is escaped too so `]]>` can never appear
/// literally in text content.
pub fn escape_text(s: &str) -> String {
    escape_with(s, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\r' => Some("&#xD;"),
        _ => None,
    })
}

/// Escape an attribute value for emission between double quotes.
pub fn escape_attr(s: &str) -> String {
    escape_with(s, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '"' => Some("&quot;"),
        '\t' => Some("&#x9;"),
        '\n' => Some("&#xA;"),
        '\r' => Some("&#xD;"),
        _ => None,
    })
}
