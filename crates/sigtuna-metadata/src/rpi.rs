#![forbid(unsafe_code)]

//! mdrpi: registration and publication information.
//!
//! Federation operators use these elements to state who registered an
//! entity and through which aggregates its metadata has been published.

use crate::organization::LocalizedString;
use sigtuna_core::{ns, time, Result};
use sigtuna_xml::{accessor, Element};

/// The mdrpi:RegistrationInfo element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInfo {
    registration_authority: String,
    registration_instant: Option<i64>,
    registration_policies: Vec<LocalizedString>,
}

impl RegistrationInfo {
    pub fn new(registration_authority: &str) -> Result<Self> {
        Ok(Self {
            registration_authority: accessor::non_empty(
                registration_authority,
                "registrationAuthority",
            )?,
            registration_instant: None,
            registration_policies: Vec::new(),
        })
    }

    pub fn with_registration_instant(mut self, epoch: i64) -> Self {
        self.registration_instant = Some(epoch);
        self
    }

    /// Registration policies are localized URIs.
    pub fn with_registration_policy(mut self, policy: LocalizedString) -> Result<Self> {
        accessor::valid_uri(policy.value(), "mdrpi:RegistrationPolicy")?;
        self.registration_policies.push(policy);
        Ok(self)
    }

    pub fn registration_authority(&self) -> &str {
        &self.registration_authority
    }

    pub fn registration_instant(&self) -> Option<i64> {
        self.registration_instant
    }

    pub fn registration_policies(&self) -> &[LocalizedString] {
        &self.registration_policies
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MDRPI, "RegistrationInfo")?;
        let mut info = Self::new(accessor::required_attribute(node, "registrationAuthority")?)?;
        info.registration_instant = accessor::optional_attribute(node, "registrationInstant")
            .map(time::parse_instant)
            .transpose()?;
        for child in accessor::children(node, ns::MDRPI, "RegistrationPolicy") {
            info = info.with_registration_policy(LocalizedString::parse(child)?)?;
        }
        Ok(info)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MDRPI, ns::MDRPI, "RegistrationInfo");
        e.set_attr("registrationAuthority", &self.registration_authority);
        e.set_attr_opt(
            "registrationInstant",
            self.registration_instant.map(time::format_instant).as_deref(),
        );
        for policy in &self.registration_policies {
            e.push(policy.write_as(ns::prefix::MDRPI, ns::MDRPI, "RegistrationPolicy"));
        }
        e
    }
}

/// One hop of a publication path: who published, when, under which id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    publisher: String,
    creation_instant: Option<i64>,
    publication_id: Option<String>,
}

impl Publication {
    pub fn new(publisher: &str) -> Result<Self> {
        Ok(Self {
            publisher: accessor::non_empty(publisher, "publisher")?,
            creation_instant: None,
            publication_id: None,
        })
    }

    pub fn with_creation_instant(mut self, epoch: i64) -> Self {
        self.creation_instant = Some(epoch);
        self
    }

    pub fn with_publication_id(mut self, id: &str) -> Result<Self> {
        self.publication_id = Some(accessor::non_empty(id, "publicationId")?);
        Ok(self)
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn creation_instant(&self) -> Option<i64> {
        self.creation_instant
    }

    pub fn publication_id(&self) -> Option<&str> {
        self.publication_id.as_deref()
    }

    fn parse(node: roxmltree::Node<'_, '_>, local: &str) -> Result<Self> {
        accessor::expect_element(node, ns::MDRPI, local)?;
        let mut publication = Self::new(accessor::required_attribute(node, "publisher")?)?;
        publication.creation_instant = accessor::optional_attribute(node, "creationInstant")
            .map(time::parse_instant)
            .transpose()?;
        publication.publication_id = accessor::optional_attribute(node, "publicationId")
            .map(|id| accessor::non_empty(id, "publicationId"))
            .transpose()?;
        Ok(publication)
    }

    fn write_attrs(&self, e: &mut Element) {
        e.set_attr("publisher", &self.publisher);
        e.set_attr_opt(
            "creationInstant",
            self.creation_instant.map(time::format_instant).as_deref(),
        );
        e.set_attr_opt("publicationId", self.publication_id.as_deref());
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        Self::parse(node, "Publication")
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MDRPI, ns::MDRPI, "Publication");
        self.write_attrs(&mut e);
        e
    }
}

/// The mdrpi:PublicationInfo element: a Publication's attributes plus
/// localized usage policy URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationInfo {
    publication: Publication,
    usage_policies: Vec<LocalizedString>,
}

impl PublicationInfo {
    pub fn new(publication: Publication) -> Self {
        Self {
            publication,
            usage_policies: Vec::new(),
        }
    }

    pub fn with_usage_policy(mut self, policy: LocalizedString) -> Result<Self> {
        accessor::valid_uri(policy.value(), "mdrpi:UsagePolicy")?;
        self.usage_policies.push(policy);
        Ok(self)
    }

    pub fn publication(&self) -> &Publication {
        &self.publication
    }

    pub fn usage_policies(&self) -> &[LocalizedString] {
        &self.usage_policies
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        let mut info = Self::new(Publication::parse(node, "PublicationInfo")?);
        for child in accessor::children(node, ns::MDRPI, "UsagePolicy") {
            info = info.with_usage_policy(LocalizedString::parse(child)?)?;
        }
        Ok(info)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MDRPI, ns::MDRPI, "PublicationInfo");
        self.publication.write_attrs(&mut e);
        for policy in &self.usage_policies {
            e.push(policy.write_as(ns::prefix::MDRPI, ns::MDRPI, "UsagePolicy"));
        }
        e
    }
}

/// The mdrpi:PublicationPath element: at least one Publication, in
/// publication order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationPath {
    publications: Vec<Publication>,
}

impl PublicationPath {
    pub fn new(publications: Vec<Publication>) -> Result<Self> {
        Ok(Self {
            publications: accessor::at_least_one(
                publications,
                "mdrpi:PublicationPath",
                "mdrpi:Publication",
            )?,
        })
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MDRPI, "PublicationPath")?;
        let publications = accessor::children(node, ns::MDRPI, "Publication")
            .into_iter()
            .map(Publication::from_xml)
            .collect::<Result<_>>()?;
        Self::new(publications)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MDRPI, ns::MDRPI, "PublicationPath");
        for publication in &self.publications {
            e.push(publication.to_xml());
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_core::Error;

    #[test]
    fn test_registration_info_round_trip() {
        let info = RegistrationInfo::new("https://registrar.example.org")
            .unwrap()
            .with_registration_instant(1_234_567_890)
            .with_registration_policy(
                LocalizedString::new("en", "https://registrar.example.org/policy").unwrap(),
            )
            .unwrap();
        let xml = info.to_xml().to_string();
        assert!(xml.contains(r#"registrationInstant="2009-02-13T23:31:30Z""#));

        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(RegistrationInfo::from_xml(doc.root_element()).unwrap(), info);
    }

    #[test]
    fn test_publication_path_round_trip() {
        let path = PublicationPath::new(vec![
            Publication::new("SomePublisher")
                .unwrap()
                .with_creation_instant(1_234_567_890)
                .with_publication_id("SomePublicationId")
                .unwrap(),
            Publication::new("SomeOtherPublisher").unwrap(),
        ])
        .unwrap();

        let xml = path.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let parsed = PublicationPath::from_xml(doc.root_element()).unwrap();
        assert_eq!(parsed, path);
        assert_eq!(parsed.publications()[0].publisher(), "SomePublisher");
        assert_eq!(parsed.publications()[0].creation_instant(), Some(1_234_567_890));
    }

    #[test]
    fn test_empty_publication_path_rejected() {
        assert!(matches!(
            PublicationPath::new(vec![]),
            Err(Error::MissingElement(_))
        ));
    }

    #[test]
    fn test_missing_publisher_rejected() {
        let xml = concat!(
            r#"<mdrpi:Publication xmlns:mdrpi="urn:oasis:names:tc:SAML:metadata:rpi" "#,
            r#"creationInstant="2009-02-13T23:31:30Z"/>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            Publication::from_xml(doc.root_element()),
            Err(Error::MissingAttribute(_))
        ));
    }

    #[test]
    fn test_publication_info_with_usage_policy() {
        let info = PublicationInfo::new(Publication::new("SomePublisher").unwrap())
            .with_usage_policy(
                LocalizedString::new("en", "https://federation.example.org/terms").unwrap(),
            )
            .unwrap();
        let xml = info.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(PublicationInfo::from_xml(doc.root_element()).unwrap(), info);
    }
}
