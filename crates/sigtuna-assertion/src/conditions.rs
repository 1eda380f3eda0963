#![forbid(unsafe_code)]

//! Conditions and its condition kinds: AudienceRestriction, OneTimeUse,
//! ProxyRestriction.
//!
//! This is only the data model; evaluating conditions against a wall
//! clock or an audience set is a separate rule-evaluation concern.

use sigtuna_core::{ns, time, Error, Result};
use sigtuna_xml::{accessor, Element};

/// The saml:AudienceRestriction element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudienceRestriction {
    audiences: Vec<String>,
}

impl AudienceRestriction {
    pub fn new(audiences: Vec<String>) -> Result<Self> {
        let audiences = accessor::at_least_one(
            audiences,
            "saml:AudienceRestriction",
            "saml:Audience",
        )?;
        Ok(Self { audiences })
    }

    pub fn audiences(&self) -> &[String] {
        &self.audiences
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "AudienceRestriction")?;
        let audiences = accessor::children(node, ns::SAML, "Audience")
            .into_iter()
            .map(|n| accessor::non_empty(&accessor::text_content(n), "saml:Audience"))
            .collect::<Result<Vec<_>>>()?;
        Self::new(audiences)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "AudienceRestriction");
        for audience in &self.audiences {
            let mut a = Element::new(ns::prefix::SAML, ns::SAML, "Audience");
            a.push_text(audience);
            e.push(a);
        }
        e
    }
}

/// The saml:ProxyRestriction element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyRestriction {
    pub count: Option<u32>,
    pub audiences: Vec<String>,
}

impl ProxyRestriction {
    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "ProxyRestriction")?;
        let count = accessor::optional_attribute(node, "Count")
            .map(|v| {
                v.parse::<u32>().map_err(|_| {
                    Error::SchemaViolation(format!(
                        "ProxyRestriction Count '{v}' is not a non-negative integer"
                    ))
                })
            })
            .transpose()?;
        let audiences = accessor::children(node, ns::SAML, "Audience")
            .into_iter()
            .map(|n| accessor::non_empty(&accessor::text_content(n), "saml:Audience"))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { count, audiences })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "ProxyRestriction");
        e.set_attr_opt("Count", self.count.map(|c| c.to_string()).as_deref());
        for audience in &self.audiences {
            let mut a = Element::new(ns::prefix::SAML, ns::SAML, "Audience");
            a.push_text(audience);
            e.push(a);
        }
        e
    }
}

/// The saml:Conditions element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    pub not_before: Option<i64>,
    pub not_on_or_after: Option<i64>,
    pub audience_restrictions: Vec<AudienceRestriction>,
    pub one_time_use: bool,
    pub proxy_restriction: Option<ProxyRestriction>,
}

impl Conditions {
    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAML, "Conditions")?;

        let not_before = accessor::optional_attribute(node, ns::attr::NOT_BEFORE)
            .map(time::parse_instant)
            .transpose()?;
        let not_on_or_after = accessor::optional_attribute(node, ns::attr::NOT_ON_OR_AFTER)
            .map(time::parse_instant)
            .transpose()?;

        let audience_restrictions = accessor::children(node, ns::SAML, "AudienceRestriction")
            .into_iter()
            .map(AudienceRestriction::from_xml)
            .collect::<Result<Vec<_>>>()?;

        let one_time_use_nodes = accessor::children(node, ns::SAML, "OneTimeUse");
        let one_time_use = accessor::at_most_one(
            one_time_use_nodes,
            "saml:Conditions",
            "saml:OneTimeUse",
        )?
        .is_some();

        let proxy_nodes = accessor::children(node, ns::SAML, "ProxyRestriction");
        let proxy_restriction = accessor::at_most_one(
            proxy_nodes,
            "saml:Conditions",
            "saml:ProxyRestriction",
        )?
        .map(ProxyRestriction::from_xml)
        .transpose()?;

        Ok(Self {
            not_before,
            not_on_or_after,
            audience_restrictions,
            one_time_use,
            proxy_restriction,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAML, ns::SAML, "Conditions");
        e.set_attr_opt(
            ns::attr::NOT_BEFORE,
            self.not_before.map(time::format_instant).as_deref(),
        );
        e.set_attr_opt(
            ns::attr::NOT_ON_OR_AFTER,
            self.not_on_or_after.map(time::format_instant).as_deref(),
        );
        for restriction in &self.audience_restrictions {
            e.push(restriction.to_xml());
        }
        if self.one_time_use {
            e.push(Element::new(ns::prefix::SAML, ns::SAML, "OneTimeUse"));
        }
        e.push_opt(self.proxy_restriction.as_ref().map(ProxyRestriction::to_xml));
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let conditions = Conditions {
            not_before: Some(1_102_238_519),
            not_on_or_after: Some(1_102_238_819),
            audience_restrictions: vec![AudienceRestriction::new(vec![
                "https://sp.example.org".into(),
            ])
            .unwrap()],
            one_time_use: true,
            proxy_restriction: Some(ProxyRestriction {
                count: Some(2),
                audiences: vec!["https://proxy.example.org".into()],
            }),
        };
        let xml = conditions.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(Conditions::from_xml(doc.root_element()).unwrap(), conditions);
    }

    #[test]
    fn test_audience_restriction_needs_audience() {
        let xml = r#"<saml:AudienceRestriction xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion"/>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            AudienceRestriction::from_xml(doc.root_element()),
            Err(Error::MissingElement(_))
        ));
    }

    #[test]
    fn test_duplicate_one_time_use_rejected() {
        let xml = concat!(
            r#"<saml:Conditions xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">"#,
            r#"<saml:OneTimeUse/><saml:OneTimeUse/></saml:Conditions>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            Conditions::from_xml(doc.root_element()),
            Err(Error::TooManyElements(_))
        ));
    }

    #[test]
    fn test_non_zulu_timestamp_rejected() {
        let xml = concat!(
            r#"<saml:Conditions xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" "#,
            r#"NotBefore="2004-12-05T09:21:59+01:00"/>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            Conditions::from_xml(doc.root_element()),
            Err(Error::ProtocolViolation(_))
        ));
    }
}
