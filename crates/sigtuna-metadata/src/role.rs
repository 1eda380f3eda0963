#![forbid(unsafe_code)]

//! The md:RoleDescriptor extension point.
//!
//! RoleDescriptor is abstract: a concrete instance declares its subtype
//! through `xsi:type`. Parsing consults an injected registry of handlers;
//! an unregistered type falls back to [`UnknownRoleDescriptor`], which
//! keeps the whole subtree verbatim so nothing is lost across a
//! parse/serialize cycle.

use crate::contact::ContactPerson;
use crate::extensions::Extensions;
use crate::key::KeyDescriptor;
use crate::organization::Organization;
use sigtuna_core::{ns, time, Result, TypeKey};
use sigtuna_xml::registry::{self, ExtensionRegistry};
use sigtuna_xml::{accessor, Chunk, Element};

/// The attributes and children every RoleDescriptor subtype shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleFields {
    id: Option<String>,
    valid_until: Option<i64>,
    cache_duration: Option<String>,
    error_url: Option<String>,
    protocol_support: Vec<String>,
    extensions: Option<Extensions>,
    key_descriptors: Vec<KeyDescriptor>,
    organization: Option<Organization>,
    contacts: Vec<ContactPerson>,
}

impl RoleFields {
    /// At least one supported protocol URI is required.
    pub fn new(protocol_support: Vec<String>) -> Result<Self> {
        let protocol_support = accessor::at_least_one(
            protocol_support,
            "md:RoleDescriptor",
            "protocolSupportEnumeration entry",
        )?;
        for uri in &protocol_support {
            accessor::valid_uri(uri, "protocolSupportEnumeration")?;
        }
        Ok(Self {
            id: None,
            valid_until: None,
            cache_duration: None,
            error_url: None,
            protocol_support,
            extensions: None,
            key_descriptors: Vec::new(),
            organization: None,
            contacts: Vec::new(),
        })
    }

    pub fn with_id(mut self, id: &str) -> Result<Self> {
        self.id = Some(accessor::non_empty(id, "RoleDescriptor ID")?);
        Ok(self)
    }

    pub fn with_valid_until(mut self, epoch: i64) -> Self {
        self.valid_until = Some(epoch);
        self
    }

    pub fn with_cache_duration(mut self, duration: &str) -> Result<Self> {
        time::check_duration(duration)?;
        self.cache_duration = Some(duration.to_owned());
        Ok(self)
    }

    pub fn with_error_url(mut self, url: &str) -> Result<Self> {
        self.error_url = Some(accessor::valid_uri(url, "errorURL")?);
        Ok(self)
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub fn with_key_descriptor(mut self, key: KeyDescriptor) -> Self {
        self.key_descriptors.push(key);
        self
    }

    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organization = Some(organization);
        self
    }

    pub fn with_contact(mut self, contact: ContactPerson) -> Self {
        self.contacts.push(contact);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn valid_until(&self) -> Option<i64> {
        self.valid_until
    }

    pub fn cache_duration(&self) -> Option<&str> {
        self.cache_duration.as_deref()
    }

    pub fn error_url(&self) -> Option<&str> {
        self.error_url.as_deref()
    }

    pub fn protocol_support(&self) -> &[String] {
        &self.protocol_support
    }

    pub fn extensions(&self) -> Option<&Extensions> {
        self.extensions.as_ref()
    }

    pub fn key_descriptors(&self) -> &[KeyDescriptor] {
        &self.key_descriptors
    }

    pub fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }

    pub fn contacts(&self) -> &[ContactPerson] {
        &self.contacts
    }

    /// Parse the shared attributes and children off a role node.
    pub fn parse(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        let protocol_support =
            accessor::required_attribute(node, "protocolSupportEnumeration")?
                .split_whitespace()
                .map(str::to_owned)
                .collect();
        let mut fields = Self::new(protocol_support)?;

        fields.id = accessor::optional_attribute(node, ns::attr::ID)
            .map(|id| accessor::non_empty(id, "RoleDescriptor ID"))
            .transpose()?;
        fields.valid_until = accessor::optional_attribute(node, ns::attr::VALID_UNTIL)
            .map(time::parse_instant)
            .transpose()?;
        fields.cache_duration = accessor::optional_attribute(node, ns::attr::CACHE_DURATION)
            .map(|d| time::check_duration(d).map(|()| d.to_owned()))
            .transpose()?;
        fields.error_url = accessor::optional_attribute(node, "errorURL")
            .map(|u| accessor::valid_uri(u, "errorURL"))
            .transpose()?;

        let parent = node.tag_name().name().to_owned();
        fields.extensions = accessor::at_most_one(
            accessor::children(node, ns::MD, "Extensions"),
            &parent,
            "md:Extensions",
        )?
        .map(Extensions::from_xml)
        .transpose()?;
        fields.key_descriptors = accessor::children(node, ns::MD, "KeyDescriptor")
            .into_iter()
            .map(KeyDescriptor::from_xml)
            .collect::<Result<_>>()?;
        fields.organization = accessor::at_most_one(
            accessor::children(node, ns::MD, "Organization"),
            &parent,
            "md:Organization",
        )?
        .map(Organization::from_xml)
        .transpose()?;
        fields.contacts = accessor::children(node, ns::MD, "ContactPerson")
            .into_iter()
            .map(ContactPerson::from_xml)
            .collect::<Result<_>>()?;

        Ok(fields)
    }

    /// Emit the shared attributes onto a role element.
    pub fn write_attrs(&self, e: &mut Element) {
        e.set_attr_opt(ns::attr::ID, self.id.as_deref());
        e.set_attr_opt(
            ns::attr::VALID_UNTIL,
            self.valid_until.map(time::format_instant).as_deref(),
        );
        e.set_attr_opt(ns::attr::CACHE_DURATION, self.cache_duration.as_deref());
        e.set_attr_opt("errorURL", self.error_url.as_deref());
        e.set_attr("protocolSupportEnumeration", &self.protocol_support.join(" "));
    }

    /// Emit the shared children in schema order.
    pub fn write_children(&self, e: &mut Element) {
        e.push_opt(self.extensions.as_ref().map(Extensions::to_xml));
        for key in &self.key_descriptors {
            e.push(key.to_xml());
        }
        e.push_opt(self.organization.as_ref().map(Organization::to_xml));
        for contact in &self.contacts {
            e.push(contact.to_xml());
        }
    }
}

/// A parsed RoleDescriptor subtype.
pub trait RoleDescriptor: std::fmt::Debug {
    /// The shared base fields.
    fn fields(&self) -> &RoleFields;

    /// The resolved xsi:type this instance was parsed as.
    fn xsi_type(&self) -> &TypeKey;

    /// Serialize into a parent element.
    fn write_into(&self, parent: &mut Element);
}

/// A registered parser for one xsi:type. Receives the whole
/// md:RoleDescriptor node and owns its parsing entirely.
pub type RoleHandler =
    Box<dyn Fn(roxmltree::Node<'_, '_>) -> Result<Box<dyn RoleDescriptor>> + Send + Sync>;

/// Parse an md:RoleDescriptor, dispatching on its mandatory xsi:type.
pub fn parse_role_descriptor(
    node: roxmltree::Node<'_, '_>,
    handlers: &ExtensionRegistry<RoleHandler>,
) -> Result<Box<dyn RoleDescriptor>> {
    accessor::expect_element(node, ns::MD, "RoleDescriptor")?;
    let key = registry::resolve_xsi_type(node)?;
    match handlers.resolve(&key) {
        Some(handler) => handler(node),
        None => Ok(Box::new(UnknownRoleDescriptor::from_xml(node, key)?)),
    }
}

/// The lossless fallback for an unregistered xsi:type: the base fields
/// are parsed and validated, the whole subtree is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoleDescriptor {
    fields: RoleFields,
    xsi_type: TypeKey,
    chunk: Chunk,
}

impl UnknownRoleDescriptor {
    fn from_xml(node: roxmltree::Node<'_, '_>, xsi_type: TypeKey) -> Result<Self> {
        Ok(Self {
            fields: RoleFields::parse(node)?,
            xsi_type,
            chunk: Chunk::from_node(node),
        })
    }

    /// The verbatim subtree as it appeared in the input.
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }
}

impl RoleDescriptor for UnknownRoleDescriptor {
    fn fields(&self) -> &RoleFields {
        &self.fields
    }

    fn xsi_type(&self) -> &TypeKey {
        &self.xsi_type
    }

    fn write_into(&self, parent: &mut Element) {
        self.chunk.write_into(parent);
    }
}
