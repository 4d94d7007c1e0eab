//! Rich text block object, embedded by `post.body`, `author.bio`, and
//! `project.description`.

use vetrina_schema::{ContentTypeDefinition, FieldDefinition};

pub fn definition() -> ContentTypeDefinition {
    ContentTypeDefinition::object("blockContent", "Block Content")
        .field(
            FieldDefinition::select("style", ["normal", "h1", "h2", "h3", "h4", "blockquote"])
                .title("Style")
                .default_value("normal"),
        )
        .field(FieldDefinition::select("list", ["bullet", "number"]).title("List"))
        .field(FieldDefinition::text("text").title("Text"))
        .field(FieldDefinition::url("link").title("Link"))
}
