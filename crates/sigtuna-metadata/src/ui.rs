#![forbid(unsafe_code)]

//! mdui: user interface hints for metadata consumers.
//!
//! UIInfo carries per-language display material for an entity; DiscoHints
//! helps discovery services pre-select an IdP. Both live inside
//! md:Extensions of a role descriptor.

use crate::organization::LocalizedString;
use sigtuna_core::{ns, Error, Result};
use sigtuna_xml::{accessor, Element};

/// A localized URI-valued element (mdui:InformationURL and friends).
/// An empty value is tolerated; a non-empty one must be a URI.
fn parse_localized_uri(node: roxmltree::Node<'_, '_>, context: &str) -> Result<LocalizedString> {
    let localized = LocalizedString::parse(node)?;
    if !localized.value().is_empty() {
        accessor::valid_uri(localized.value(), context)?;
    }
    Ok(localized)
}

/// A space-separated keyword list for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords {
    lang: String,
    values: Vec<String>,
}

impl Keywords {
    /// Keywords are space-joined on output, so none may itself contain
    /// whitespace.
    pub fn new(lang: &str, values: Vec<String>) -> Result<Self> {
        let values = accessor::at_least_one(values, "mdui:Keywords", "keyword")?;
        for value in &values {
            if value.is_empty() || value.contains(char::is_whitespace) {
                return Err(Error::SchemaViolation(format!(
                    "mdui:Keywords entry '{value}' must be a single non-empty token"
                )));
            }
        }
        Ok(Self {
            lang: accessor::non_empty(lang, "xml:lang")?,
            values,
        })
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MDUI, "Keywords")?;
        let lang = accessor::required_attribute_ns(node, ns::XML, ns::attr::LANG)?;
        let values = accessor::text_content(node)
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        Self::new(lang, values)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MDUI, ns::MDUI, "Keywords");
        e.set_attr("xml:lang", &self.lang);
        e.push_text(&self.values.join(" "));
        e
    }
}

/// The mdui:Logo element: a URL plus its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    url: String,
    height: u32,
    width: u32,
    lang: Option<String>,
}

impl Logo {
    pub fn new(url: &str, height: u32, width: u32) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::SchemaViolation(
                "mdui:Logo dimensions must be positive".into(),
            ));
        }
        Ok(Self {
            url: accessor::valid_uri(url, "mdui:Logo")?,
            height,
            width,
            lang: None,
        })
    }

    pub fn with_lang(mut self, lang: &str) -> Result<Self> {
        self.lang = Some(accessor::non_empty(lang, "xml:lang")?);
        Ok(self)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MDUI, "Logo")?;
        let parse_dim = |name: &str| -> Result<u32> {
            accessor::required_attribute(node, name)?.parse().map_err(|_| {
                Error::SchemaViolation(format!("mdui:Logo {name} is not an unsigned integer"))
            })
        };
        let mut logo = Self::new(
            &accessor::text_content(node),
            parse_dim("height")?,
            parse_dim("width")?,
        )?;
        logo.lang = accessor::optional_attribute_ns(node, ns::XML, ns::attr::LANG)
            .map(|lang| accessor::non_empty(lang, "xml:lang"))
            .transpose()?;
        Ok(logo)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MDUI, ns::MDUI, "Logo");
        e.set_attr_opt("xml:lang", self.lang.as_deref());
        e.set_attr("height", &self.height.to_string());
        e.set_attr("width", &self.width.to_string());
        e.push_text(&self.url);
        e
    }
}

/// The mdui:UIInfo container. Every child list may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiInfo {
    display_names: Vec<LocalizedString>,
    descriptions: Vec<LocalizedString>,
    keywords: Vec<Keywords>,
    logos: Vec<Logo>,
    information_urls: Vec<LocalizedString>,
    privacy_statement_urls: Vec<LocalizedString>,
}

impl UiInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display_name(mut self, name: LocalizedString) -> Self {
        self.display_names.push(name);
        self
    }

    pub fn with_description(mut self, description: LocalizedString) -> Self {
        self.descriptions.push(description);
        self
    }

    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords.push(keywords);
        self
    }

    pub fn with_logo(mut self, logo: Logo) -> Self {
        self.logos.push(logo);
        self
    }

    pub fn with_information_url(mut self, url: LocalizedString) -> Result<Self> {
        accessor::valid_uri(url.value(), "mdui:InformationURL")?;
        self.information_urls.push(url);
        Ok(self)
    }

    pub fn with_privacy_statement_url(mut self, url: LocalizedString) -> Result<Self> {
        accessor::valid_uri(url.value(), "mdui:PrivacyStatementURL")?;
        self.privacy_statement_urls.push(url);
        Ok(self)
    }

    pub fn display_names(&self) -> &[LocalizedString] {
        &self.display_names
    }

    pub fn descriptions(&self) -> &[LocalizedString] {
        &self.descriptions
    }

    pub fn keywords(&self) -> &[Keywords] {
        &self.keywords
    }

    pub fn logos(&self) -> &[Logo] {
        &self.logos
    }

    pub fn information_urls(&self) -> &[LocalizedString] {
        &self.information_urls
    }

    pub fn privacy_statement_urls(&self) -> &[LocalizedString] {
        &self.privacy_statement_urls
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MDUI, "UIInfo")?;
        let mut info = Self::new();
        for child in accessor::children(node, ns::MDUI, "DisplayName") {
            info.display_names.push(LocalizedString::parse(child)?);
        }
        for child in accessor::children(node, ns::MDUI, "Description") {
            info.descriptions.push(LocalizedString::parse(child)?);
        }
        for child in accessor::children(node, ns::MDUI, "Keywords") {
            info.keywords.push(Keywords::from_xml(child)?);
        }
        for child in accessor::children(node, ns::MDUI, "Logo") {
            info.logos.push(Logo::from_xml(child)?);
        }
        for child in accessor::children(node, ns::MDUI, "InformationURL") {
            info.information_urls
                .push(parse_localized_uri(child, "mdui:InformationURL")?);
        }
        for child in accessor::children(node, ns::MDUI, "PrivacyStatementURL") {
            info.privacy_statement_urls
                .push(parse_localized_uri(child, "mdui:PrivacyStatementURL")?);
        }
        Ok(info)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MDUI, ns::MDUI, "UIInfo");
        for name in &self.display_names {
            e.push(name.write_as(ns::prefix::MDUI, ns::MDUI, "DisplayName"));
        }
        for description in &self.descriptions {
            e.push(description.write_as(ns::prefix::MDUI, ns::MDUI, "Description"));
        }
        for keywords in &self.keywords {
            e.push(keywords.to_xml());
        }
        for logo in &self.logos {
            e.push(logo.to_xml());
        }
        for url in &self.information_urls {
            e.push(url.write_as(ns::prefix::MDUI, ns::MDUI, "InformationURL"));
        }
        for url in &self.privacy_statement_urls {
            e.push(url.write_as(ns::prefix::MDUI, ns::MDUI, "PrivacyStatementURL"));
        }
        e
    }
}

/// The mdui:DiscoHints container for discovery services.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoHints {
    ip_hints: Vec<String>,
    domain_hints: Vec<String>,
    geolocation_hints: Vec<String>,
}

impl DiscoHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ip_hint(mut self, hint: &str) -> Result<Self> {
        self.ip_hints.push(accessor::non_empty(hint, "mdui:IPHint")?);
        Ok(self)
    }

    pub fn with_domain_hint(mut self, hint: &str) -> Result<Self> {
        self.domain_hints
            .push(accessor::non_empty(hint, "mdui:DomainHint")?);
        Ok(self)
    }

    /// Geolocation hints are `geo:` URIs.
    pub fn with_geolocation_hint(mut self, hint: &str) -> Result<Self> {
        if !hint.starts_with("geo:") {
            return Err(Error::SchemaViolation(format!(
                "mdui:GeolocationHint '{hint}' is not a geo: URI"
            )));
        }
        self.geolocation_hints.push(hint.to_owned());
        Ok(self)
    }

    pub fn ip_hints(&self) -> &[String] {
        &self.ip_hints
    }

    pub fn domain_hints(&self) -> &[String] {
        &self.domain_hints
    }

    pub fn geolocation_hints(&self) -> &[String] {
        &self.geolocation_hints
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MDUI, "DiscoHints")?;
        let mut hints = Self::new();
        for child in accessor::children(node, ns::MDUI, "IPHint") {
            hints = hints.with_ip_hint(&accessor::text_content(child))?;
        }
        for child in accessor::children(node, ns::MDUI, "DomainHint") {
            hints = hints.with_domain_hint(&accessor::text_content(child))?;
        }
        for child in accessor::children(node, ns::MDUI, "GeolocationHint") {
            hints = hints.with_geolocation_hint(&accessor::text_content(child))?;
        }
        Ok(hints)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MDUI, ns::MDUI, "DiscoHints");
        let mut push_list = |local: &str, values: &[String]| {
            for value in values {
                let mut child = Element::new(ns::prefix::MDUI, ns::MDUI, local);
                child.push_text(value);
                e.push(child);
            }
        };
        push_list("IPHint", &self.ip_hints);
        push_list("DomainHint", &self.domain_hints);
        push_list("GeolocationHint", &self.geolocation_hints);
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UiInfo {
        UiInfo::new()
            .with_display_name(LocalizedString::new("en", "Example University").unwrap())
            .with_description(LocalizedString::new("en", "Higher education").unwrap())
            .with_keywords(Keywords::new("en", vec!["education".into(), "research".into()]).unwrap())
            .with_logo(Logo::new("https://example.edu/logo.png", 64, 64).unwrap())
            .with_information_url(LocalizedString::new("en", "https://example.edu/en/").unwrap())
            .unwrap()
    }

    #[test]
    fn test_ui_info_round_trip() {
        let info = sample();
        let xml = info.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(UiInfo::from_xml(doc.root_element()).unwrap(), info);
    }

    #[test]
    fn test_information_url_must_be_uri() {
        let xml = concat!(
            r#"<mdui:UIInfo xmlns:mdui="urn:oasis:names:tc:SAML:metadata:ui">"#,
            r#"<mdui:InformationURL xml:lang="en">this is no url</mdui:InformationURL>"#,
            r#"</mdui:UIInfo>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            UiInfo::from_xml(doc.root_element()),
            Err(Error::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_information_url_empty_value_tolerated() {
        let xml = concat!(
            r#"<mdui:UIInfo xmlns:mdui="urn:oasis:names:tc:SAML:metadata:ui">"#,
            r#"<mdui:InformationURL xml:lang="en"></mdui:InformationURL>"#,
            r#"</mdui:UIInfo>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        let info = UiInfo::from_xml(doc.root_element()).unwrap();
        assert_eq!(info.information_urls()[0].value(), "");
    }

    #[test]
    fn test_information_url_requires_lang() {
        let xml = concat!(
            r#"<mdui:UIInfo xmlns:mdui="urn:oasis:names:tc:SAML:metadata:ui">"#,
            r#"<mdui:InformationURL>https://example.edu/</mdui:InformationURL>"#,
            r#"</mdui:UIInfo>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            UiInfo::from_xml(doc.root_element()),
            Err(Error::MissingAttribute(_))
        ));
    }

    #[test]
    fn test_keywords_reject_multiword_token() {
        assert!(matches!(
            Keywords::new("en", vec!["two words".into()]),
            Err(Error::SchemaViolation(_))
        ));
        assert!(matches!(
            Keywords::new("en", vec![]),
            Err(Error::MissingElement(_))
        ));
    }

    #[test]
    fn test_logo_requires_dimensions() {
        let xml = concat!(
            r#"<mdui:Logo xmlns:mdui="urn:oasis:names:tc:SAML:metadata:ui" "#,
            r#"height="64">https://example.edu/logo.png</mdui:Logo>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            Logo::from_xml(doc.root_element()),
            Err(Error::MissingAttribute(_))
        ));
        assert!(Logo::new("https://example.edu/logo.png", 0, 64).is_err());
    }

    #[test]
    fn test_disco_hints_round_trip() {
        let hints = DiscoHints::new()
            .with_ip_hint("130.59.0.0/16")
            .unwrap()
            .with_domain_hint("example.edu")
            .unwrap()
            .with_geolocation_hint("geo:47.37,8.54")
            .unwrap();
        let xml = hints.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(DiscoHints::from_xml(doc.root_element()).unwrap(), hints);
    }

    #[test]
    fn test_geolocation_hint_needs_geo_scheme() {
        assert!(matches!(
            DiscoHints::new().with_geolocation_hint("47.37,8.54"),
            Err(Error::SchemaViolation(_))
        ));
    }
}
