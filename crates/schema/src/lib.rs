//! Vetrina Schema SDK
//!
//! Types and builder APIs for describing headless content models. A site
//! declares its content types with [`ContentTypeDefinition`] and
//! [`FieldDefinition`], then builds a [`SchemaRegistry`] which validates
//! the whole configuration once at load time. Instances are checked
//! against the registry field by field.

pub mod registry;
pub mod types;
pub mod validate;

pub use registry::{SchemaError, SchemaRegistry};
pub use types::{ContentTypeDefinition, FieldDefinition, FieldKind, TypeKind};
pub use validate::{ValidationRule, ValueError, check_rule, validate_field};

pub mod prelude {
    pub use crate::registry::{SchemaError, SchemaRegistry};
    pub use crate::types::{ContentTypeDefinition, FieldDefinition, FieldKind, TypeKind};
    pub use crate::validate::{ValidationRule, ValueError};
}
