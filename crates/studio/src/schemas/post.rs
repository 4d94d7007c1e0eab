//! Blog post content type.

use vetrina_schema::{ContentTypeDefinition, FieldDefinition, ValidationRule};

use super::SLUG_PATTERN;

pub fn definition() -> ContentTypeDefinition {
    ContentTypeDefinition::document("post", "Post")
        .field(FieldDefinition::text("title").title("Title").required())
        .field(
            FieldDefinition::text("slug")
                .title("Slug")
                .required()
                .validate(ValidationRule::pattern(SLUG_PATTERN)),
        )
        .field(
            FieldDefinition::text("excerpt")
                .title("Excerpt")
                .max_length(300),
        )
        .field(FieldDefinition::rich_text("body", "blockContent").title("Body"))
        .field(FieldDefinition::reference("author", "author").title("Author"))
        .field(
            FieldDefinition::reference("tags", "tag")
                .title("Tags")
                .cardinality(-1),
        )
        .field(FieldDefinition::datetime("publishedAt").title("Published at"))
}
