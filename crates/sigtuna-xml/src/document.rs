#![forbid(unsafe_code)]

//! XML document wrapper over roxmltree.
//!
//! Owns the document text so that any parsed node can recover its exact
//! original byte span via [`SamlDocument::raw`]. Signature verification
//! and lossless chunk capture both depend on the original bytes, never a
//! re-serialization: re-serializing is not guaranteed byte-identical
//! (whitespace, attribute order).

use sigtuna_core::{Error, Result};

/// An owned XML document. Stores the text; parsed trees borrow from it.
pub struct SamlDocument {
    text: String,
}

impl SamlDocument {
    /// Parse and validate XML from a string, taking ownership.
    pub fn parse(text: String) -> Result<Self> {
        let _doc =
            roxmltree::Document::parse(&text).map_err(|e| Error::XmlParse(e.to_string()))?;
        Ok(Self { text })
    }

    /// Parse and validate XML from bytes.
    pub fn parse_bytes(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::XmlParse(format!("invalid UTF-8: {e}")))?
            .to_owned();
        Self::parse(text)
    }

    /// Get the raw XML text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parse the document and return a temporary `roxmltree::Document`.
    ///
    /// Re-parses from the stored text. Call once at the top of a parse
    /// pipeline and pass the root node down through `from_xml` calls.
    pub fn parse_doc(&self) -> Result<roxmltree::Document<'_>> {
        roxmltree::Document::parse(&self.text).map_err(|e| Error::XmlParse(e.to_string()))
    }

    /// The exact original text of one parsed node, including its tag,
    /// attributes and subtree, exactly as it appeared in the input.
    pub fn raw(&self, node: roxmltree::Node<'_, '_>) -> &str {
        &self.text[node.range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            SamlDocument::parse("<a><b></a>".into()),
            Err(Error::XmlParse(_))
        ));
    }

    #[test]
    fn test_raw_recovers_original_span() {
        let doc = SamlDocument::parse("<a>\n  <b  x='1' >t</b>\n</a>".into()).unwrap();
        let parsed = doc.parse_doc().unwrap();
        let b = parsed
            .root_element()
            .children()
            .find(|n| n.is_element())
            .unwrap();
        assert_eq!(doc.raw(b), "<b  x='1' >t</b>");
    }
}
