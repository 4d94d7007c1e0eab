//! Content type definitions for the studio.
//!
//! One module per type, registered in [`schema_types`] in the order the
//! editing tool lists them.

use vetrina_schema::ContentTypeDefinition;

pub mod author;
pub mod block_content;
pub mod post;
pub mod project;
pub mod social;
pub mod tag;

/// Lowercase words separated by single hyphens, as used in URL paths.
pub const SLUG_PATTERN: &str = "^[a-z0-9]+(-[a-z0-9]+)*$";

/// All content types, in listing order.
pub fn schema_types() -> Vec<ContentTypeDefinition> {
    vec![
        post::definition(),
        author::definition(),
        tag::definition(),
        block_content::definition(),
        project::definition(),
        social::definition(),
    ]
}
