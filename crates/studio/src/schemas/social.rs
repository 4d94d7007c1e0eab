//! Social link content type.

use vetrina_schema::{ContentTypeDefinition, FieldDefinition, ValidationRule};

/// Platforms offered in the editing tool, in menu order.
pub const PLATFORMS: [&str; 19] = [
    "Twitter",
    "Mastodon",
    "Instagram",
    "Github",
    "Email",
    "Linkedin",
    "Facebook",
    "YouTube",
    "Twitch",
    "TikTok",
    "WhatsApp",
    "SnapChat",
    "CodePen",
    "Discord",
    "GitLab",
    "Reddit",
    "Skype",
    "Steam",
    "Telegram",
];

pub fn definition() -> ContentTypeDefinition {
    ContentTypeDefinition::document("social", "Social")
        .field(FieldDefinition::select("type", PLATFORMS).title("Type"))
        .field(
            FieldDefinition::url("link")
                .title("Link")
                .validate(ValidationRule::uri_scheme(["http", "https", "mailto"])),
        )
        .field(
            FieldDefinition::boolean("active")
                .title("Active")
                .default_value(true),
        )
        // Sort weight managed by the listing tool, not entered by hand.
        .field(FieldDefinition::number("order").title("Order").hidden())
}
