//! Author content type.

use vetrina_schema::{ContentTypeDefinition, FieldDefinition, ValidationRule};

use super::SLUG_PATTERN;

pub fn definition() -> ContentTypeDefinition {
    ContentTypeDefinition::document("author", "Author")
        .field(FieldDefinition::text("name").title("Name").required())
        .field(
            FieldDefinition::text("slug")
                .title("Slug")
                .validate(ValidationRule::pattern(SLUG_PATTERN)),
        )
        .field(FieldDefinition::rich_text("bio", "blockContent").title("Bio"))
}
