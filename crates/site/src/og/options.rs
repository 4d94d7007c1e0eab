//! Preview image descriptors.
//!
//! One [`OgImageEntry`] is produced per blog document. The descriptor
//! serializes with the field casing the downstream preview renderer
//! expects (`bgGradient`, `lineHeight`, and so on).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::content::Document;

/// An RGB color, serialized as a `[r, g, b]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Font weights the preview renderer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    Normal,
    Bold,
    ExtraBold,
}

/// Logical edge of the canvas, in writing-mode terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderSide {
    BlockStart,
    InlineEnd,
    BlockEnd,
    InlineStart,
}

/// Accent band along one edge of the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    pub color: Rgb,
    pub width: u32,
    pub side: BorderSide,
}

/// Logo image composited onto the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logo {
    pub path: PathBuf,
    /// Target size in pixels, `[width, height]`.
    pub size: [u32; 2],
}

/// Typography for one text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    pub family: String,
    pub weight: FontWeight,
    pub size: u32,
    pub line_height: f64,
    pub color: Rgb,
}

/// Title and description typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    pub title: FontStyle,
    pub description: FontStyle,
}

/// Everything the preview renderer needs for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OgImageOptions {
    pub title: String,
    pub description: String,
    pub logo: Logo,
    pub border: Border,
    /// Vertical gradient stops; a single stop means a solid fill.
    pub bg_gradient: Vec<Rgb>,
    pub padding: u32,
    pub font: FontConfig,
    /// Font assets, fetched by URL at generation time.
    pub fonts: Vec<String>,
}

/// A generated route and its descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OgImageEntry {
    pub route: String,
    pub options: OgImageOptions,
}

/// Text color shared by title and description.
const TEXT_COLOR: Rgb = Rgb(55, 65, 81);

impl OgImageOptions {
    /// The site's fixed preview styling around a document's front matter.
    pub fn for_document(document: &Document) -> Self {
        Self {
            title: document.front_matter.title.clone(),
            description: document
                .front_matter
                .description
                .clone()
                .unwrap_or_default(),
            logo: Logo {
                path: PathBuf::from("./public/images/joost.jpg"),
                size: [150, 150],
            },
            border: Border {
                color: Rgb(249, 115, 22),
                width: 20,
                side: BorderSide::InlineStart,
            },
            bg_gradient: vec![Rgb(250, 235, 215)],
            padding: 30,
            font: FontConfig {
                title: FontStyle {
                    family: "Anybody".to_string(),
                    weight: FontWeight::ExtraBold,
                    size: 64,
                    line_height: 1.1,
                    color: TEXT_COLOR,
                },
                description: FontStyle {
                    family: "Poppins".to_string(),
                    weight: FontWeight::Normal,
                    size: 38,
                    line_height: 1.1,
                    color: TEXT_COLOR,
                },
            },
            fonts: vec![
                "https://api.fontsource.org/v1/fonts/anybody/latin-800-normal.ttf".to_string(),
                "https://api.fontsource.org/v1/fonts/poppins/latin-400-normal.ttf".to_string(),
            ],
        }
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::content::FrontMatter;

    fn document(title: &str, description: Option<&str>) -> Document {
        Document {
            path: PathBuf::from("hello.md"),
            route: "hello".to_string(),
            front_matter: FrontMatter {
                title: title.to_string(),
                description: description.map(str::to_string),
                date: None,
                draft: false,
            },
            body: String::new(),
        }
    }

    #[test]
    fn descriptor_carries_front_matter_texts() {
        let options = OgImageOptions::for_document(&document("Hello", Some("World")));
        assert_eq!(options.title, "Hello");
        assert_eq!(options.description, "World");
    }

    #[test]
    fn descriptor_uses_two_distinct_typefaces() {
        let options = OgImageOptions::for_document(&document("Hello", Some("World")));
        assert_ne!(options.font.title.family, options.font.description.family);
        assert_ne!(options.font.title.weight, options.font.description.weight);
        assert_ne!(options.font.title.size, options.font.description.size);
        assert_eq!(options.fonts.len(), 2);
    }

    #[test]
    fn descriptor_styling_is_fixed() {
        let options = OgImageOptions::for_document(&document("Hello", None));
        assert_eq!(options.border.color, Rgb(249, 115, 22));
        assert_eq!(options.border.width, 20);
        assert_eq!(options.border.side, BorderSide::InlineStart);
        assert_eq!(options.bg_gradient, vec![Rgb(250, 235, 215)]);
        assert_eq!(options.padding, 30);
        assert_eq!(options.logo.size, [150, 150]);
        assert_eq!(options.description, "");
    }

    #[test]
    fn descriptor_serializes_renderer_casing() {
        let options = OgImageOptions::for_document(&document("Hello", Some("World")));
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["bgGradient"][0], serde_json::json!([250, 235, 215]));
        assert_eq!(json["border"]["side"], "inline-start");
        assert_eq!(json["font"]["title"]["lineHeight"], 1.1);
        assert_eq!(json["font"]["title"]["weight"], "ExtraBold");
    }
}
