//! Content type and field definitions.
//!
//! These types describe the shape of authorable content. Definitions are
//! built once at startup with the builder methods, collected into a
//! [`SchemaRegistry`](crate::registry::SchemaRegistry), and never mutated
//! afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::ValidationRule;

/// How a content type is stored and listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Independently stored, listed, and referenced.
    Document,
    /// Embeddable inside another type's fields only.
    Object,
}

/// A content type definition.
///
/// The `name` is the machine name (unique across the registry); `title` is
/// what editors see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTypeDefinition {
    pub name: String,
    pub title: String,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub fields: Vec<FieldDefinition>,
}

impl ContentTypeDefinition {
    /// Create a document type (independently stored and listed).
    pub fn document(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(name, title, TypeKind::Document)
    }

    /// Create an object type (embeddable only).
    pub fn object(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(name, title, TypeKind::Object)
    }

    fn new(name: impl Into<String>, title: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind,
            description: String::new(),
            fields: Vec::new(),
        }
    }

    /// Set the editor-facing description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a field. Field order is preserved and meaningful.
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether this type is a document type.
    pub fn is_document(&self) -> bool {
        self.kind == TypeKind::Document
    }

    /// Whether this type is an object type.
    pub fn is_object(&self) -> bool {
        self.kind == TypeKind::Object
    }
}

/// A single field definition within a content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub title: String,
    pub kind: FieldKind,

    /// Initial value applied when the field is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Hidden from manual entry in the editing tool.
    #[serde(default)]
    pub hidden: bool,

    /// Validation rules, applied in order with short-circuit on failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,

    /// Number of values: 1 for a single value, -1 for unlimited.
    #[serde(default = "default_cardinality")]
    pub cardinality: i32,
}

fn default_cardinality() -> i32 {
    1
}

impl FieldDefinition {
    /// Create a short text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text { max_length: None })
    }

    /// Create a rich text field embedding the named object type.
    pub fn rich_text(name: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::RichText {
                block_type: block_type.into(),
            },
        )
    }

    /// Create a URL field.
    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Url)
    }

    /// Create a boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Create a numeric field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// Create a datetime field (RFC 3339 values).
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Datetime)
    }

    /// Create a reference field targeting the named document type.
    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Reference {
                target: target.into(),
            },
        )
    }

    /// Create an enumerated string field with a fixed list of allowed values.
    pub fn select<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            FieldKind::Select {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }

    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            kind,
            default: None,
            hidden: false,
            validation: Vec::new(),
            cardinality: 1,
        }
    }

    /// Set the editor-facing title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Mark as required (appends [`ValidationRule::Required`]).
    pub fn required(mut self) -> Self {
        self.validation.push(ValidationRule::Required);
        self
    }

    /// Hide from manual entry.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set the initial value for absent fields.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Append a validation rule to the chain.
    pub fn validate(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    /// Set the maximum character length for a text field.
    pub fn max_length(mut self, max: usize) -> Self {
        if let FieldKind::Text { ref mut max_length } = self.kind {
            *max_length = Some(max);
        }
        self
    }

    /// Set the cardinality (-1 for unlimited values).
    pub fn cardinality(mut self, n: i32) -> Self {
        self.cardinality = n;
        self
    }

    /// Whether the validation chain requires a value.
    pub fn is_required(&self) -> bool {
        self.validation.contains(&ValidationRule::Required)
    }

    /// Whether this field holds a single value.
    pub fn is_single(&self) -> bool {
        self.cardinality == 1
    }
}

/// Field value kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Short text.
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },

    /// Portable rich text, stored as an array of blocks of the named
    /// object type.
    RichText { block_type: String },

    /// Absolute URL.
    Url,

    /// True/false.
    Boolean,

    /// Integer or float.
    Number,

    /// RFC 3339 datetime string.
    Datetime,

    /// Reference to a document of the named content type.
    Reference { target: String },

    /// One of a fixed, ordered list of string literals.
    Select { options: Vec<String> },
}

impl FieldKind {
    /// Get the kind name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::RichText { .. } => "rich_text",
            FieldKind::Url => "url",
            FieldKind::Boolean => "boolean",
            FieldKind::Number => "number",
            FieldKind::Datetime => "datetime",
            FieldKind::Reference { .. } => "reference",
            FieldKind::Select { .. } => "select",
        }
    }
}
