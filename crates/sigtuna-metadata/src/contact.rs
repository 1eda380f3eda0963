#![forbid(unsafe_code)]

//! md:ContactPerson.

use sigtuna_core::{ns, Error, Result};
use sigtuna_xml::{accessor, Element};

/// The contactType attribute values the metadata schema allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactType {
    Technical,
    Support,
    Administrative,
    Billing,
    Other,
}

impl ContactType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Support => "support",
            Self::Administrative => "administrative",
            Self::Billing => "billing",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "technical" => Ok(Self::Technical),
            "support" => Ok(Self::Support),
            "administrative" => Ok(Self::Administrative),
            "billing" => Ok(Self::Billing),
            "other" => Ok(Self::Other),
            v => Err(Error::SchemaViolation(format!(
                "'{v}' is not a contactType value"
            ))),
        }
    }
}

/// The md:ContactPerson element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPerson {
    contact_type: ContactType,
    company: Option<String>,
    given_name: Option<String>,
    surname: Option<String>,
    email_addresses: Vec<String>,
    telephone_numbers: Vec<String>,
}

impl ContactPerson {
    pub fn new(contact_type: ContactType) -> Self {
        Self {
            contact_type,
            company: None,
            given_name: None,
            surname: None,
            email_addresses: Vec::new(),
            telephone_numbers: Vec::new(),
        }
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = Some(company.to_owned());
        self
    }

    pub fn with_given_name(mut self, name: &str) -> Self {
        self.given_name = Some(name.to_owned());
        self
    }

    pub fn with_surname(mut self, name: &str) -> Self {
        self.surname = Some(name.to_owned());
        self
    }

    pub fn with_email_address(mut self, address: &str) -> Self {
        self.email_addresses.push(address.to_owned());
        self
    }

    pub fn with_telephone_number(mut self, number: &str) -> Self {
        self.telephone_numbers.push(number.to_owned());
        self
    }

    pub fn contact_type(&self) -> ContactType {
        self.contact_type
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn given_name(&self) -> Option<&str> {
        self.given_name.as_deref()
    }

    pub fn surname(&self) -> Option<&str> {
        self.surname.as_deref()
    }

    pub fn email_addresses(&self) -> &[String] {
        &self.email_addresses
    }

    pub fn telephone_numbers(&self) -> &[String] {
        &self.telephone_numbers
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::MD, "ContactPerson")?;

        let contact_type = ContactType::parse(accessor::required_attribute(node, "contactType")?)?;
        let single = |local: &str| -> Result<Option<String>> {
            accessor::at_most_one(
                accessor::children(node, ns::MD, local),
                "md:ContactPerson",
                local,
            )
            .map(|n| n.map(accessor::text_content))
        };

        Ok(Self {
            contact_type,
            company: single("Company")?,
            given_name: single("GivenName")?,
            surname: single("SurName")?,
            email_addresses: accessor::children(node, ns::MD, "EmailAddress")
                .into_iter()
                .map(accessor::text_content)
                .collect(),
            telephone_numbers: accessor::children(node, ns::MD, "TelephoneNumber")
                .into_iter()
                .map(accessor::text_content)
                .collect(),
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::MD, ns::MD, "ContactPerson");
        e.set_attr("contactType", self.contact_type.as_str());

        let mut text_child = |local: &str, value: &str| {
            let mut c = Element::new(ns::prefix::MD, ns::MD, local);
            c.push_text(value);
            e.push(c);
        };
        if let Some(company) = &self.company {
            text_child("Company", company);
        }
        if let Some(name) = &self.given_name {
            text_child("GivenName", name);
        }
        if let Some(name) = &self.surname {
            text_child("SurName", name);
        }
        for address in &self.email_addresses {
            text_child("EmailAddress", address);
        }
        for number in &self.telephone_numbers {
            text_child("TelephoneNumber", number);
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let contact = ContactPerson::new(ContactType::Technical)
            .with_given_name("Ada")
            .with_surname("Lovelace")
            .with_email_address("mailto:ada@example.org");
        let xml = contact.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(ContactPerson::from_xml(doc.root_element()).unwrap(), contact);
    }

    #[test]
    fn test_bad_contact_type_rejected() {
        assert!(ContactType::parse("sales").is_err());
    }

    #[test]
    fn test_contact_type_required() {
        let xml = r#"<md:ContactPerson xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata"/>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            ContactPerson::from_xml(doc.root_element()),
            Err(Error::MissingAttribute(_))
        ));
    }
}
