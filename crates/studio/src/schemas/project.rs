//! Portfolio project content type.

use vetrina_schema::{ContentTypeDefinition, FieldDefinition};

pub fn definition() -> ContentTypeDefinition {
    ContentTypeDefinition::document("project", "Project")
        .field(FieldDefinition::text("name").title("Name"))
        .field(FieldDefinition::url("link").title("Link"))
        .field(FieldDefinition::rich_text("description", "blockContent").title("Description"))
        .field(
            FieldDefinition::boolean("active")
                .title("Active")
                .default_value(true),
        )
        .field(FieldDefinition::datetime("publishedAt").title("Published at"))
        // Sort weight managed by the listing tool, not entered by hand.
        .field(FieldDefinition::number("order").title("Order").hidden())
}
