//! Tag content type.

use vetrina_schema::{ContentTypeDefinition, FieldDefinition};

pub fn definition() -> ContentTypeDefinition {
    ContentTypeDefinition::document("tag", "Tag")
        .field(FieldDefinition::text("title").title("Title").required())
        .field(FieldDefinition::text("description").title("Description"))
}
