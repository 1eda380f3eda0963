#![forbid(unsafe_code)]

//! Typed `md:` (metadata namespace) elements, including the
//! RoleDescriptor extension point, plus the mdui, mdrpi and mdattr
//! extension schemas.

pub mod contact;
pub mod entity_attributes;
pub mod extensions;
pub mod key;
pub mod organization;
pub mod role;
pub mod rpi;
pub mod ui;

pub use contact::{ContactPerson, ContactType};
pub use entity_attributes::{EntityAttributes, EntityAttributesChild};
pub use extensions::Extensions;
pub use key::{EncryptionMethod, KeyDescriptor, KeyUse};
pub use organization::{LocalizedString, Organization};
pub use role::{
    parse_role_descriptor, RoleDescriptor, RoleFields, RoleHandler, UnknownRoleDescriptor,
};
pub use rpi::{Publication, PublicationInfo, PublicationPath, RegistrationInfo};
pub use ui::{DiscoHints, Keywords, Logo, UiInfo};
