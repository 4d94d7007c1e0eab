//! Vetrina Studio
//!
//! Configuration for the hosted editing tool: the concrete content type
//! schemas for the site plus the studio settings (project, dataset, and
//! which tools the editing UI loads). The `vetrina schema` subcommand
//! serializes all of this as the configuration surface the tool consumes.

use serde::{Deserialize, Serialize};
use vetrina_schema::{SchemaError, SchemaRegistry};

pub mod schemas;

pub use schemas::schema_types;

/// Tools loaded into the editing UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudioTool {
    /// Structured content listing and editing.
    Desk,
    /// Query console against the content dataset.
    Vision,
}

/// Settings for one studio deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioConfig {
    pub name: String,
    pub title: String,
    pub project_id: String,
    pub dataset: String,
    pub tools: Vec<StudioTool>,
}

/// The studio settings for this site.
pub fn studio_config() -> StudioConfig {
    StudioConfig {
        name: "default".to_string(),
        title: "joostschuur.com".to_string(),
        project_id: "qyspo9wn".to_string(),
        dataset: "production".to_string(),
        tools: vec![StudioTool::Desk, StudioTool::Vision],
    }
}

/// Build the schema registry from this site's content types.
///
/// Fails if the definitions are inconsistent; callers treat that as a
/// startup error.
pub fn load_registry() -> Result<SchemaRegistry, SchemaError> {
    SchemaRegistry::build(schema_types())
}

/// The complete configuration surface the hosted tool consumes: studio
/// settings plus the content type schemas.
pub fn config_surface() -> Result<serde_json::Value, serde_json::Error> {
    let mut surface = serde_json::to_value(studio_config())?;
    if let serde_json::Value::Object(map) = &mut surface {
        map.insert(
            "schema".to_string(),
            serde_json::json!({ "types": schema_types() }),
        );
    }
    Ok(surface)
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn registry_builds_clean() {
        let registry = load_registry().unwrap();
        assert_eq!(
            registry.type_names(),
            vec!["post", "author", "tag", "blockContent", "project", "social"]
        );
    }

    #[test]
    fn document_types_exclude_embedded_objects() {
        let registry = load_registry().unwrap();
        let docs: Vec<_> = registry.document_types().map(|t| t.name.as_str()).collect();
        assert_eq!(docs, vec!["post", "author", "tag", "project", "social"]);
    }

    #[test]
    fn studio_config_serializes_camel_case() {
        let json = serde_json::to_value(studio_config()).unwrap();
        assert_eq!(json["projectId"], "qyspo9wn");
        assert_eq!(json["dataset"], "production");
        assert_eq!(json["tools"][0], "desk");
        assert_eq!(json["tools"][1], "vision");
    }

    #[test]
    fn config_surface_includes_schema_types() {
        let surface = config_surface().unwrap();
        assert_eq!(surface["name"], "default");
        assert_eq!(surface["schema"]["types"][0]["name"], "post");
        assert_eq!(surface["schema"]["types"].as_array().unwrap().len(), 6);
    }
}
