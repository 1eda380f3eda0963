#![forbid(unsafe_code)]

//! samlp:AuthnRequest and its helper elements.

use crate::message::MessageFields;
use sigtuna_assertion::{Conditions, Subject};
use sigtuna_core::{ns, Error, Result};
use sigtuna_security::SignatureBackend;
use sigtuna_xml::{accessor, Element};

/// The samlp:NameIDPolicy element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIdPolicy {
    format: Option<String>,
    sp_name_qualifier: Option<String>,
    allow_create: Option<bool>,
}

impl NameIdPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: &str) -> Result<Self> {
        self.format = Some(accessor::valid_uri(format, "NameIDPolicy Format")?);
        Ok(self)
    }

    pub fn with_sp_name_qualifier(mut self, qualifier: &str) -> Self {
        self.sp_name_qualifier = Some(qualifier.to_owned());
        self
    }

    pub fn with_allow_create(mut self, allow: bool) -> Self {
        self.allow_create = Some(allow);
        self
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn sp_name_qualifier(&self) -> Option<&str> {
        self.sp_name_qualifier.as_deref()
    }

    pub fn allow_create(&self) -> Option<bool> {
        self.allow_create
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "NameIDPolicy")?;
        let format = match accessor::optional_attribute(node, ns::attr::FORMAT) {
            Some(f) => Some(accessor::valid_uri(f, "NameIDPolicy Format")?),
            None => None,
        };
        let allow_create = accessor::optional_attribute(node, "AllowCreate")
            .map(|v| accessor::parse_bool(v, "NameIDPolicy AllowCreate"))
            .transpose()?;
        Ok(Self {
            format,
            sp_name_qualifier: accessor::optional_attribute(node, "SPNameQualifier")
                .map(str::to_owned),
            allow_create,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "NameIDPolicy");
        e.set_attr_opt(ns::attr::FORMAT, self.format.as_deref());
        e.set_attr_opt("SPNameQualifier", self.sp_name_qualifier.as_deref());
        e.set_attr_opt(
            "AllowCreate",
            self.allow_create.map(|b| if b { "true" } else { "false" }),
        );
        e
    }
}

/// Comparison rule of a samlp:RequestedAuthnContext.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextComparison {
    #[default]
    Exact,
    Minimum,
    Maximum,
    Better,
}

impl ContextComparison {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::Better => "better",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "exact" => Ok(Self::Exact),
            "minimum" => Ok(Self::Minimum),
            "maximum" => Ok(Self::Maximum),
            "better" => Ok(Self::Better),
            other => Err(Error::SchemaViolation(format!(
                "'{other}' is not a RequestedAuthnContext Comparison value"
            ))),
        }
    }
}

/// The samlp:RequestedAuthnContext element. Carries either class
/// references or declaration references, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedAuthnContext {
    comparison: Option<ContextComparison>,
    class_refs: Vec<String>,
    decl_refs: Vec<String>,
}

impl RequestedAuthnContext {
    pub fn with_class_refs(refs: Vec<String>) -> Result<Self> {
        let refs = accessor::at_least_one(
            refs,
            "samlp:RequestedAuthnContext",
            "saml:AuthnContextClassRef",
        )?;
        for r in &refs {
            accessor::valid_uri(r, "AuthnContextClassRef")?;
        }
        Ok(Self {
            comparison: None,
            class_refs: refs,
            decl_refs: Vec::new(),
        })
    }

    pub fn with_decl_refs(refs: Vec<String>) -> Result<Self> {
        let refs = accessor::at_least_one(
            refs,
            "samlp:RequestedAuthnContext",
            "saml:AuthnContextDeclRef",
        )?;
        for r in &refs {
            accessor::valid_uri(r, "AuthnContextDeclRef")?;
        }
        Ok(Self {
            comparison: None,
            class_refs: Vec::new(),
            decl_refs: refs,
        })
    }

    pub fn with_comparison(mut self, comparison: ContextComparison) -> Self {
        self.comparison = Some(comparison);
        self
    }

    pub fn comparison(&self) -> Option<ContextComparison> {
        self.comparison
    }

    pub fn class_refs(&self) -> &[String] {
        &self.class_refs
    }

    pub fn decl_refs(&self) -> &[String] {
        &self.decl_refs
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "RequestedAuthnContext")?;

        let comparison = accessor::optional_attribute(node, "Comparison")
            .map(ContextComparison::parse)
            .transpose()?;

        let class_refs: Vec<String> = accessor::children(node, ns::SAML, "AuthnContextClassRef")
            .into_iter()
            .map(|n| accessor::valid_uri(&accessor::text_content(n), "AuthnContextClassRef"))
            .collect::<Result<_>>()?;
        let decl_refs: Vec<String> = accessor::children(node, ns::SAML, "AuthnContextDeclRef")
            .into_iter()
            .map(|n| accessor::valid_uri(&accessor::text_content(n), "AuthnContextDeclRef"))
            .collect::<Result<_>>()?;

        if !class_refs.is_empty() && !decl_refs.is_empty() {
            return Err(Error::SchemaViolation(
                "samlp:RequestedAuthnContext mixes class and declaration references".into(),
            ));
        }

        let mut ctx = if !decl_refs.is_empty() {
            Self::with_decl_refs(decl_refs)?
        } else {
            Self::with_class_refs(class_refs)?
        };
        ctx.comparison = comparison;
        Ok(ctx)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "RequestedAuthnContext");
        e.set_attr_opt(
            "Comparison",
            self.comparison.map(ContextComparison::as_str),
        );
        for r in &self.class_refs {
            let mut c = Element::new(ns::prefix::SAML, ns::SAML, "AuthnContextClassRef");
            c.push_text(r);
            e.push(c);
        }
        for r in &self.decl_refs {
            let mut c = Element::new(ns::prefix::SAML, ns::SAML, "AuthnContextDeclRef");
            c.push_text(r);
            e.push(c);
        }
        e
    }
}

/// One samlp:IDPEntry inside an IDPList.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdpEntry {
    provider_id: String,
    name: Option<String>,
    loc: Option<String>,
}

impl IdpEntry {
    pub fn new(provider_id: &str) -> Result<Self> {
        Ok(Self {
            provider_id: accessor::valid_uri(provider_id, "IDPEntry ProviderID")?,
            name: None,
            loc: None,
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    pub fn with_loc(mut self, loc: &str) -> Result<Self> {
        self.loc = Some(accessor::valid_uri(loc, "IDPEntry Loc")?);
        Ok(self)
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn loc(&self) -> Option<&str> {
        self.loc.as_deref()
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "IDPEntry")?;
        Ok(Self {
            provider_id: accessor::valid_uri(
                accessor::required_attribute(node, "ProviderID")?,
                "IDPEntry ProviderID",
            )?,
            name: accessor::optional_attribute(node, "Name").map(str::to_owned),
            loc: accessor::optional_attribute(node, "Loc").map(str::to_owned),
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "IDPEntry");
        e.set_attr("ProviderID", &self.provider_id);
        e.set_attr_opt("Name", self.name.as_deref());
        e.set_attr_opt("Loc", self.loc.as_deref());
        e
    }
}

/// The samlp:IDPList element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdpList {
    entries: Vec<IdpEntry>,
    get_complete: Option<String>,
}

impl IdpList {
    pub fn new(entries: Vec<IdpEntry>) -> Result<Self> {
        let entries = accessor::at_least_one(entries, "samlp:IDPList", "samlp:IDPEntry")?;
        Ok(Self {
            entries,
            get_complete: None,
        })
    }

    pub fn with_get_complete(mut self, uri: &str) -> Result<Self> {
        self.get_complete = Some(accessor::valid_uri(uri, "GetComplete")?);
        Ok(self)
    }

    pub fn entries(&self) -> &[IdpEntry] {
        &self.entries
    }

    pub fn get_complete(&self) -> Option<&str> {
        self.get_complete.as_deref()
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "IDPList")?;
        let entries = accessor::children(node, ns::SAMLP, "IDPEntry")
            .into_iter()
            .map(IdpEntry::from_xml)
            .collect::<Result<Vec<_>>>()?;
        let get_complete = accessor::at_most_one(
            accessor::children(node, ns::SAMLP, "GetComplete"),
            "samlp:IDPList",
            "samlp:GetComplete",
        )?
        .map(|n| accessor::valid_uri(&accessor::text_content(n), "GetComplete"))
        .transpose()?;
        let mut list = Self::new(entries)?;
        list.get_complete = get_complete;
        Ok(list)
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "IDPList");
        for entry in &self.entries {
            e.push(entry.to_xml());
        }
        if let Some(uri) = &self.get_complete {
            let mut g = Element::new(ns::prefix::SAMLP, ns::SAMLP, "GetComplete");
            g.push_text(uri);
            e.push(g);
        }
        e
    }
}

/// The samlp:Scoping element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoping {
    proxy_count: Option<u32>,
    idp_list: Option<IdpList>,
    requester_ids: Vec<String>,
}

impl Scoping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proxy_count(mut self, count: u32) -> Self {
        self.proxy_count = Some(count);
        self
    }

    pub fn with_idp_list(mut self, list: IdpList) -> Self {
        self.idp_list = Some(list);
        self
    }

    pub fn with_requester_id(mut self, id: &str) -> Result<Self> {
        self.requester_ids
            .push(accessor::valid_uri(id, "RequesterID")?);
        Ok(self)
    }

    pub fn proxy_count(&self) -> Option<u32> {
        self.proxy_count
    }

    pub fn idp_list(&self) -> Option<&IdpList> {
        self.idp_list.as_ref()
    }

    pub fn requester_ids(&self) -> &[String] {
        &self.requester_ids
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "Scoping")?;
        let proxy_count = accessor::optional_attribute(node, "ProxyCount")
            .map(|v| {
                v.parse::<u32>().map_err(|_| {
                    Error::SchemaViolation(format!("ProxyCount: '{v}' is not a non-negative integer"))
                })
            })
            .transpose()?;
        let idp_list = accessor::at_most_one(
            accessor::children(node, ns::SAMLP, "IDPList"),
            "samlp:Scoping",
            "samlp:IDPList",
        )?
        .map(IdpList::from_xml)
        .transpose()?;
        let requester_ids = accessor::children(node, ns::SAMLP, "RequesterID")
            .into_iter()
            .map(|n| accessor::valid_uri(&accessor::text_content(n), "RequesterID"))
            .collect::<Result<_>>()?;
        Ok(Self {
            proxy_count,
            idp_list,
            requester_ids,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "Scoping");
        e.set_attr_opt(
            "ProxyCount",
            self.proxy_count.map(|c| c.to_string()).as_deref(),
        );
        e.push_opt(self.idp_list.as_ref().map(IdpList::to_xml));
        for id in &self.requester_ids {
            let mut r = Element::new(ns::prefix::SAMLP, ns::SAMLP, "RequesterID");
            r.push_text(id);
            e.push(r);
        }
        e
    }
}

/// Where the response should be delivered: either a literal URL or an
/// index into the requester's published endpoints. The two are mutually
/// exclusive, which the type makes unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseTarget {
    Url(String),
    Index(u16),
}

/// The samlp:AuthnRequest message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthnRequest {
    fields: MessageFields,
    force_authn: Option<bool>,
    is_passive: Option<bool>,
    protocol_binding: Option<String>,
    response_target: Option<ResponseTarget>,
    attribute_consuming_service_index: Option<u16>,
    provider_name: Option<String>,
    subject: Option<Subject>,
    name_id_policy: Option<NameIdPolicy>,
    conditions: Option<Conditions>,
    requested_authn_context: Option<RequestedAuthnContext>,
    scoping: Option<Scoping>,
}

impl AuthnRequest {
    pub fn new(fields: MessageFields) -> Self {
        Self {
            fields,
            force_authn: None,
            is_passive: None,
            protocol_binding: None,
            response_target: None,
            attribute_consuming_service_index: None,
            provider_name: None,
            subject: None,
            name_id_policy: None,
            conditions: None,
            requested_authn_context: None,
            scoping: None,
        }
    }

    pub fn with_force_authn(mut self, force: bool) -> Self {
        self.force_authn = Some(force);
        self
    }

    pub fn with_is_passive(mut self, passive: bool) -> Self {
        self.is_passive = Some(passive);
        self
    }

    pub fn with_protocol_binding(mut self, binding: &str) -> Result<Self> {
        self.protocol_binding = Some(accessor::valid_uri(binding, "ProtocolBinding")?);
        Ok(self)
    }

    pub fn with_response_target(mut self, target: ResponseTarget) -> Result<Self> {
        if let ResponseTarget::Url(url) = &target {
            accessor::valid_uri(url, "AssertionConsumerServiceURL")?;
        }
        self.response_target = Some(target);
        Ok(self)
    }

    pub fn with_attribute_consuming_service_index(mut self, index: u16) -> Self {
        self.attribute_consuming_service_index = Some(index);
        self
    }

    pub fn with_provider_name(mut self, name: &str) -> Self {
        self.provider_name = Some(name.to_owned());
        self
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_name_id_policy(mut self, policy: NameIdPolicy) -> Self {
        self.name_id_policy = Some(policy);
        self
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn with_requested_authn_context(mut self, ctx: RequestedAuthnContext) -> Self {
        self.requested_authn_context = Some(ctx);
        self
    }

    pub fn with_scoping(mut self, scoping: Scoping) -> Self {
        self.scoping = Some(scoping);
        self
    }

    pub fn fields(&self) -> &MessageFields {
        &self.fields
    }

    pub fn force_authn(&self) -> Option<bool> {
        self.force_authn
    }

    pub fn is_passive(&self) -> Option<bool> {
        self.is_passive
    }

    pub fn protocol_binding(&self) -> Option<&str> {
        self.protocol_binding.as_deref()
    }

    pub fn response_target(&self) -> Option<&ResponseTarget> {
        self.response_target.as_ref()
    }

    pub fn attribute_consuming_service_index(&self) -> Option<u16> {
        self.attribute_consuming_service_index
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider_name.as_deref()
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn name_id_policy(&self) -> Option<&NameIdPolicy> {
        self.name_id_policy.as_ref()
    }

    pub fn conditions(&self) -> Option<&Conditions> {
        self.conditions.as_ref()
    }

    pub fn requested_authn_context(&self) -> Option<&RequestedAuthnContext> {
        self.requested_authn_context.as_ref()
    }

    pub fn scoping(&self) -> Option<&Scoping> {
        self.scoping.as_ref()
    }

    pub fn from_xml(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        accessor::expect_element(node, ns::SAMLP, "AuthnRequest")?;
        let fields = MessageFields::parse(node)?;

        let force_authn = accessor::optional_attribute(node, "ForceAuthn")
            .map(|v| accessor::parse_bool(v, "AuthnRequest ForceAuthn"))
            .transpose()?;
        let is_passive = accessor::optional_attribute(node, "IsPassive")
            .map(|v| accessor::parse_bool(v, "AuthnRequest IsPassive"))
            .transpose()?;
        let protocol_binding = accessor::optional_attribute(node, "ProtocolBinding")
            .map(|v| accessor::valid_uri(v, "ProtocolBinding"))
            .transpose()?;

        let acs_url = accessor::optional_attribute(node, "AssertionConsumerServiceURL");
        let acs_index = accessor::optional_attribute(node, "AssertionConsumerServiceIndex");
        let response_target = match (acs_url, acs_index) {
            (Some(_), Some(_)) => {
                return Err(Error::ProtocolViolation(
                    "AuthnRequest carries both AssertionConsumerServiceURL \
                     and AssertionConsumerServiceIndex"
                        .into(),
                ))
            }
            (Some(url), None) => Some(ResponseTarget::Url(accessor::valid_uri(
                url,
                "AssertionConsumerServiceURL",
            )?)),
            (None, Some(index)) => Some(ResponseTarget::Index(index.parse().map_err(|_| {
                Error::SchemaViolation(format!(
                    "AssertionConsumerServiceIndex: '{index}' is not an unsigned short"
                ))
            })?)),
            (None, None) => None,
        };

        let attribute_consuming_service_index =
            accessor::optional_attribute(node, "AttributeConsumingServiceIndex")
                .map(|v| {
                    v.parse::<u16>().map_err(|_| {
                        Error::SchemaViolation(format!(
                            "AttributeConsumingServiceIndex: '{v}' is not an unsigned short"
                        ))
                    })
                })
                .transpose()?;

        let subject = accessor::at_most_one(
            accessor::children(node, ns::SAML, "Subject"),
            "samlp:AuthnRequest",
            "saml:Subject",
        )?
        .map(Subject::from_xml)
        .transpose()?;

        let name_id_policy = accessor::at_most_one(
            accessor::children(node, ns::SAMLP, "NameIDPolicy"),
            "samlp:AuthnRequest",
            "samlp:NameIDPolicy",
        )?
        .map(NameIdPolicy::from_xml)
        .transpose()?;

        let conditions = accessor::at_most_one(
            accessor::children(node, ns::SAML, "Conditions"),
            "samlp:AuthnRequest",
            "saml:Conditions",
        )?
        .map(Conditions::from_xml)
        .transpose()?;

        let requested_authn_context = accessor::at_most_one(
            accessor::children(node, ns::SAMLP, "RequestedAuthnContext"),
            "samlp:AuthnRequest",
            "samlp:RequestedAuthnContext",
        )?
        .map(RequestedAuthnContext::from_xml)
        .transpose()?;

        let scoping = accessor::at_most_one(
            accessor::children(node, ns::SAMLP, "Scoping"),
            "samlp:AuthnRequest",
            "samlp:Scoping",
        )?
        .map(Scoping::from_xml)
        .transpose()?;

        Ok(Self {
            fields,
            force_authn,
            is_passive,
            protocol_binding,
            response_target,
            attribute_consuming_service_index,
            provider_name: accessor::optional_attribute(node, "ProviderName").map(str::to_owned),
            subject,
            name_id_policy,
            conditions,
            requested_authn_context,
            scoping,
        })
    }

    pub fn to_xml(&self) -> Element {
        let mut e = Element::new(ns::prefix::SAMLP, ns::SAMLP, "AuthnRequest");
        e.declare_ns(ns::prefix::SAML, ns::SAML);
        self.fields.write_attrs(&mut e);
        e.set_attr_opt(
            "ForceAuthn",
            self.force_authn.map(|b| if b { "true" } else { "false" }),
        );
        e.set_attr_opt(
            "IsPassive",
            self.is_passive.map(|b| if b { "true" } else { "false" }),
        );
        e.set_attr_opt("ProtocolBinding", self.protocol_binding.as_deref());
        match &self.response_target {
            Some(ResponseTarget::Url(url)) => e.set_attr("AssertionConsumerServiceURL", url),
            Some(ResponseTarget::Index(index)) => {
                e.set_attr("AssertionConsumerServiceIndex", &index.to_string())
            }
            None => {}
        }
        e.set_attr_opt(
            "AttributeConsumingServiceIndex",
            self.attribute_consuming_service_index
                .map(|i| i.to_string())
                .as_deref(),
        );
        e.set_attr_opt("ProviderName", self.provider_name.as_deref());

        self.fields.write_children(&mut e);
        e.push_opt(self.subject.as_ref().map(Subject::to_xml));
        e.push_opt(self.name_id_policy.as_ref().map(NameIdPolicy::to_xml));
        e.push_opt(self.conditions.as_ref().map(Conditions::to_xml));
        e.push_opt(
            self.requested_authn_context
                .as_ref()
                .map(RequestedAuthnContext::to_xml),
        );
        e.push_opt(self.scoping.as_ref().map(Scoping::to_xml));
        e
    }

    /// Sign the request's current serialization.
    pub fn sign(
        &mut self,
        backend: &dyn SignatureBackend,
        key: &[u8],
        algorithm: &str,
    ) -> Result<()> {
        let bytes = self.to_xml().to_bytes();
        self.fields.signing_mut().sign(backend, key, algorithm, bytes)
    }

    pub fn verify(&self, backend: &dyn SignatureBackend, key: &[u8]) -> Result<bool> {
        self.fields.verify(backend, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_assertion::Issuer;

    fn fields() -> MessageFields {
        MessageFields::new("_authn1", 1623508200)
            .unwrap()
            .with_issuer(Issuer::new("https://sp.example.org").unwrap())
    }

    #[test]
    fn test_round_trip() {
        let request = AuthnRequest::new(fields())
            .with_force_authn(true)
            .with_name_id_policy(
                NameIdPolicy::new()
                    .with_format(sigtuna_core::ns::NAMEID_PERSISTENT)
                    .unwrap()
                    .with_allow_create(true),
            )
            .with_requested_authn_context(
                RequestedAuthnContext::with_class_refs(vec![
                    "urn:oasis:names:tc:SAML:2.0:ac:classes:PasswordProtectedTransport".into(),
                ])
                .unwrap()
                .with_comparison(ContextComparison::Minimum),
            );

        let xml = request.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let parsed = AuthnRequest::from_xml(doc.root_element()).unwrap();
        assert_eq!(parsed, request);
        assert_eq!(parsed.force_authn(), Some(true));
        assert_eq!(
            parsed.requested_authn_context().unwrap().comparison(),
            Some(ContextComparison::Minimum)
        );
    }

    #[test]
    fn test_acs_url_and_index_conflict_rejected() {
        let xml = concat!(
            r#"<samlp:AuthnRequest xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" "#,
            r#"ID="_a" Version="2.0" IssueInstant="2021-06-12T14:30:00Z" "#,
            r#"AssertionConsumerServiceURL="https://sp.example.org/acs" "#,
            r#"AssertionConsumerServiceIndex="1"/>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            AuthnRequest::from_xml(doc.root_element()),
            Err(Error::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_response_target_is_single_valued_in_output() {
        let request = AuthnRequest::new(fields())
            .with_response_target(ResponseTarget::Index(3))
            .unwrap();
        let xml = request.to_xml().to_string();
        assert!(xml.contains(r#"AssertionConsumerServiceIndex="3""#));
        assert!(!xml.contains("AssertionConsumerServiceURL"));
    }

    #[test]
    fn test_mixed_context_refs_rejected() {
        let xml = concat!(
            r#"<samlp:RequestedAuthnContext "#,
            r#"xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" "#,
            r#"xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">"#,
            r#"<saml:AuthnContextClassRef>urn:a</saml:AuthnContextClassRef>"#,
            r#"<saml:AuthnContextDeclRef>urn:b</saml:AuthnContextDeclRef>"#,
            r#"</samlp:RequestedAuthnContext>"#
        );
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            RequestedAuthnContext::from_xml(doc.root_element()),
            Err(Error::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_bad_comparison_rejected() {
        assert!(ContextComparison::parse("exactly").is_err());
        assert_eq!(
            ContextComparison::parse("better").unwrap(),
            ContextComparison::Better
        );
    }

    #[test]
    fn test_scoping_round_trip() {
        let scoping = Scoping::new()
            .with_proxy_count(2)
            .with_idp_list(
                IdpList::new(vec![IdpEntry::new("https://idp.example.org")
                    .unwrap()
                    .with_name("Example IdP")])
                .unwrap()
                .with_get_complete("https://sp.example.org/idplist")
                .unwrap(),
            )
            .with_requester_id("https://portal.example.org")
            .unwrap();
        let xml = scoping.to_xml().to_string();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(Scoping::from_xml(doc.root_element()).unwrap(), scoping);
    }
}
