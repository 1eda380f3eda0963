#![forbid(unsafe_code)]

//! md:Organization and its localized child elements.

use sigtuna_core::{ns, Result};
use sigtuna_xml::{accessor, Element};

/// A string tagged with the xml:lang it is written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedString {
    lang: String,
    value: String,
}

impl LocalizedString {
    pub fn new(lang: &str, value: &str) -> Result<Self> {
        Ok(Self {
            lang: accessor::non_empty(lang, "xml:lang")?,
            value: value.to_owned(),
        })
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn parse(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        let lang = accessor::required_attribute_ns(node, ns::XML, ns::attr::LANG)?;
        Self::new(lang, &accessor::text_content(node))
    }

    pub(crate) fn write_as(&self, prefix: &str, ns_uri: &str, local: &str) -> Element {
        let mut e = Element::new(prefix, ns_uri, local);
        // xml: is predeclared, never emitted as an xmlns.
        e.set_attr("xml:lang", &self.lang);
        e.push_text(&self.value);
        e
    }

    fn write(&self, local: &str) -> Element {
        self.write_as(ns::prefix::MD, ns::MD, local)
    }
}

/// The md:Organization element. Each localized list needs at least one
/// entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    names: Vec<LocalizedString>,
    display_names: Vec<LocalizedString>,
    urls: Vec<LocalizedString>,
}

impl Organization {
    pub fn new(
        names: Vec<LocalizedString>,
        display_names: Vec<LocalizedString>,
        urls: Vec<LocalizedString>,
    ) -> Result<Self> {
        Ok(Self {
            names: accessor::at_least_one(names, "md:Organization", "md:OrganizationName")?,
            display_names: accessor::at_least_one(
                display_names,
                "md:Organization",
                "md:OrganizationDisplayName",
            )?,
            urls: accessor::at_least_one(urls, "md:Organization", "md:OrganizationURL")?,
        })
    }

    pub fn names(&self) -> &[LocalizedString] {
        &self.names
    }

    pub fn display_names(&self) -> &[LocalizedString] {
        &self.display_names
    }

    pub fn urls(&self) -> &[LocalizedString] {
        &self.urls
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MD, "Organization")?;
        let parse_list = |local: &str| -> Result<Vec<LocalizedString>> {
            accessor::children(node, ns::MD, local)
                .into_iter()
                .map(LocalizedString::parse)
                .collect()
        };
        Self::new(
            parse_list("OrganizationName")?,
            parse_list("OrganizationDisplayName")?,
            parse_list("OrganizationURL")?,
        )
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MD, ns::MD, "Organization");
        for name in &self.names {
            e.push(name.write("OrganizationName"));
        }
        for name in &self.display_names {
            e.push(name.write("OrganizationDisplayName"));
        }
        for url in &self.urls {
            e.push(url.write("OrganizationURL"));
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_core::Error;

    fn sample() -> Organization {
        Organization::new(
            vec![LocalizedString::new("en", "Example").unwrap()],
            vec![LocalizedString::new("en", "Example University").unwrap()],
            vec![LocalizedString::new("en", "https://example.org").unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let org = sample();
        let xml = org.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(Organization::from_xml(doc.root_element()).unwrap(), org);
    }

    #[test]
    fn test_missing_display_name_rejected() {
        assert!(matches!(
            Organization::new(
                vec![LocalizedString::new("en", "Example").unwrap()],
                vec![],
                vec![LocalizedString::new("en", "https://example.org").unwrap()],
            ),
            Err(Error::MissingElement(_))
        ));
    }

    #[test]
    fn test_missing_lang_rejected() {
        let xml = concat!(
            r#"<md:Organization xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata">"#,
            r#"<md:OrganizationName>Example</md:OrganizationName>"#,
            r#"<md:OrganizationDisplayName xml:lang="en">Example</md:OrganizationDisplayName>"#,
            r#"<md:OrganizationURL xml:lang="en">https://example.org</md:OrganizationURL>"#,
            r#"</md:Organization>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            Organization::from_xml(doc.root_element()),
            Err(Error::MissingAttribute(_))
        ));
    }
}
