//! Schema registry.
//!
//! Collects the content type definitions for a site and runs one validation
//! pass over the whole set at build time. A registry that builds is
//! internally consistent: names are unique, references resolve, rich text
//! block types exist, defaults are legal. After `build` the registry is
//! immutable and shared by reference.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use thiserror::Error;

use crate::types::{ContentTypeDefinition, FieldKind};
use crate::validate::{ValidationRule, ValueError, validate_field};

/// Nested rich text deeper than this is rejected during instance
/// validation rather than recursed into.
const MAX_RICH_TEXT_DEPTH: usize = 8;

/// Configuration errors detected while building the registry.
///
/// Any of these rejects the whole configuration; the schema never loads
/// half-valid.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate content type \"{0}\"")]
    DuplicateType(String),

    #[error("duplicate field \"{field}\" in content type \"{type_name}\"")]
    DuplicateField { type_name: String, field: String },

    #[error("field \"{type_name}.{field}\" references unknown content type \"{target}\"")]
    UnknownReference {
        type_name: String,
        field: String,
        target: String,
    },

    #[error("field \"{type_name}.{field}\" embeds \"{target}\", which is not an object type")]
    NotAnObject {
        type_name: String,
        field: String,
        target: String,
    },

    #[error("field \"{type_name}.{field}\" has an invalid default: {reason}")]
    InvalidDefault {
        type_name: String,
        field: String,
        reason: String,
    },

    #[error("field \"{type_name}.{field}\" has an invalid pattern: {source}")]
    InvalidPattern {
        type_name: String,
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("field \"{type_name}.{field}\" has an empty scheme list")]
    EmptySchemeList { type_name: String, field: String },

    #[error("unknown content type \"{0}\"")]
    UnknownType(String),
}

/// The ordered, immutable set of content type definitions for a site.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    types: Vec<ContentTypeDefinition>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Build a registry from an ordered list of definitions.
    ///
    /// This is the single load-time validation pass: it fails fast on the
    /// first inconsistency and the registry is never observed half-built.
    pub fn build(types: Vec<ContentTypeDefinition>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(types.len());

        for (i, ct) in types.iter().enumerate() {
            if index.insert(ct.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateType(ct.name.clone()));
            }

            let mut seen = HashSet::with_capacity(ct.fields.len());
            for field in &ct.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        type_name: ct.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        // Cross-type checks need the full name set, so they run second.
        for ct in &types {
            for field in &ct.fields {
                match &field.kind {
                    FieldKind::Reference { target } => {
                        if !index.contains_key(target) {
                            return Err(SchemaError::UnknownReference {
                                type_name: ct.name.clone(),
                                field: field.name.clone(),
                                target: target.clone(),
                            });
                        }
                    }
                    FieldKind::RichText { block_type } => {
                        let Some(&target_idx) = index.get(block_type) else {
                            return Err(SchemaError::UnknownReference {
                                type_name: ct.name.clone(),
                                field: field.name.clone(),
                                target: block_type.clone(),
                            });
                        };
                        if !types[target_idx].is_object() {
                            return Err(SchemaError::NotAnObject {
                                type_name: ct.name.clone(),
                                field: field.name.clone(),
                                target: block_type.clone(),
                            });
                        }
                    }
                    _ => {}
                }

                for rule in &field.validation {
                    match rule {
                        ValidationRule::Pattern { pattern } => {
                            if let Err(source) = regex::Regex::new(pattern) {
                                return Err(SchemaError::InvalidPattern {
                                    type_name: ct.name.clone(),
                                    field: field.name.clone(),
                                    source,
                                });
                            }
                        }
                        ValidationRule::UriScheme { allowed } if allowed.is_empty() => {
                            return Err(SchemaError::EmptySchemeList {
                                type_name: ct.name.clone(),
                                field: field.name.clone(),
                            });
                        }
                        _ => {}
                    }
                }

                if let Some(default) = &field.default {
                    validate_field(field, Some(default)).map_err(|e| {
                        SchemaError::InvalidDefault {
                            type_name: ct.name.clone(),
                            field: field.name.clone(),
                            reason: e.reason,
                        }
                    })?;
                }
            }
        }

        Ok(Self { types, index })
    }

    /// All content types, in registration order.
    pub fn types(&self) -> &[ContentTypeDefinition] {
        &self.types
    }

    /// Get a content type by name.
    pub fn get(&self, name: &str) -> Option<&ContentTypeDefinition> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    /// Check whether a content type exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered content types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Content type names, in registration order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }

    /// Document types only, in registration order.
    pub fn document_types(&self) -> impl Iterator<Item = &ContentTypeDefinition> {
        self.types.iter().filter(|t| t.is_document())
    }

    /// Validate one content instance against its type definition.
    ///
    /// Returns every failure rather than stopping at the first so the
    /// editing tool can report them all; within a single field the rule
    /// chain still short-circuits. Unknown fields are failures: the schema
    /// is closed.
    pub fn validate_instance(
        &self,
        type_name: &str,
        fields: &HashMap<String, Value>,
    ) -> Result<Vec<ValueError>, SchemaError> {
        let ct = self
            .get(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))?;

        let mut errors = Vec::new();
        self.validate_fields(ct, fields, &mut errors, 0);
        Ok(errors)
    }

    fn validate_fields(
        &self,
        ct: &ContentTypeDefinition,
        fields: &HashMap<String, Value>,
        errors: &mut Vec<ValueError>,
        depth: usize,
    ) {
        for field in &ct.fields {
            let value = fields.get(&field.name);
            if let Err(e) = validate_field(field, value) {
                errors.push(e);
                continue;
            }

            // Rich text blocks are instances of their object type; recurse.
            if let FieldKind::RichText { block_type } = &field.kind
                && let Some(Value::Array(blocks)) = value
            {
                if depth >= MAX_RICH_TEXT_DEPTH {
                    errors.push(ValueError::new(
                        &field.name,
                        format!("rich text nested deeper than {MAX_RICH_TEXT_DEPTH} levels"),
                    ));
                    continue;
                }
                let Some(block_ct) = self.get(block_type) else {
                    // Unreachable after build, but never panic on it.
                    continue;
                };
                for (i, block) in blocks.iter().enumerate() {
                    let Some(map) = as_field_map(block) else {
                        errors.push(ValueError::new(
                            format!("{}[{i}]", field.name),
                            "expected a rich text block object",
                        ));
                        continue;
                    };
                    let mut block_errors = Vec::new();
                    self.validate_fields(block_ct, &map, &mut block_errors, depth + 1);
                    errors.extend(block_errors.into_iter().map(|e| {
                        ValueError::new(format!("{}[{i}].{}", field.name, e.field), e.reason)
                    }));
                }
            }
        }

        for name in fields.keys() {
            if ct.get_field(name).is_none() {
                errors.push(ValueError::new(
                    name,
                    format!("not a field of content type \"{}\"", ct.name),
                ));
            }
        }
    }

    /// Fill in declared defaults for fields absent from the instance.
    pub fn apply_defaults(
        &self,
        type_name: &str,
        fields: &mut HashMap<String, Value>,
    ) -> Result<(), SchemaError> {
        let ct = self
            .get(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))?;

        for field in &ct.fields {
            if let Some(default) = &field.default
                && !fields.contains_key(&field.name)
            {
                fields.insert(field.name.clone(), default.clone());
            }
        }
        Ok(())
    }
}

fn as_field_map(value: &Value) -> Option<HashMap<String, Value>> {
    value
        .as_object()
        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}
