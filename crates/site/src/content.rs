//! Blog content sources.
//!
//! A [`ContentSource`] enumerates the Markdown documents under the blog
//! content directory. Enumeration is lazy and restartable: `documents()`
//! walks the tree fresh on every call and yields one result per file, so
//! a malformed document surfaces as its own error instead of aborting
//! the batch.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

/// Content loading errors, scoped to a single document where possible.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("io error in {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("front matter error in {path}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("content walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("non-unicode content path: {0}")]
    InvalidPath(PathBuf),
}

impl ContentError {
    /// Path of the document this error is scoped to, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ContentError::Io { path, .. } | ContentError::FrontMatter { path, .. } => Some(path),
            ContentError::Walk(e) => e.path(),
            ContentError::InvalidPath(path) => Some(path),
        }
    }
}

/// Front matter metadata for a blog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Document title (required).
    pub title: String,

    /// Description for meta tags and preview images.
    #[serde(default)]
    pub description: Option<String>,

    /// Publication date.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Drafts are enumerated but excluded from featured listings.
    #[serde(default)]
    pub draft: bool,
}

/// One Markdown document from the content directory.
#[derive(Debug, Clone)]
pub struct Document {
    /// Source file path.
    pub path: PathBuf,

    /// Route parameter: path relative to the content root, separators
    /// normalized to `/`, extension stripped.
    pub route: String,

    pub front_matter: FrontMatter,

    /// Markdown body below the front matter.
    pub body: String,
}

impl Document {
    /// Render the Markdown body to HTML.
    pub fn body_html(&self) -> String {
        let parser = pulldown_cmark::Parser::new(&self.body);
        let mut html = String::with_capacity(self.body.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, parser);
        html
    }
}

/// Enumerates Markdown documents under a content root.
#[derive(Debug, Clone)]
pub struct ContentSource {
    root: PathBuf,
}

impl ContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the content root and yield each `.md` document.
    ///
    /// The walk is deterministic (sorted by file name) and starts over on
    /// every call.
    pub fn documents(&self) -> impl Iterator<Item = Result<Document, ContentError>> + '_ {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(ContentError::Walk(e))),
                };
                if !entry.file_type().is_file() {
                    return None;
                }
                let is_md = entry.path().extension().and_then(|e| e.to_str()) == Some("md");
                if !is_md {
                    return None;
                }
                Some(self.load_document(entry.path()))
            })
    }

    fn load_document(&self, path: &Path) -> Result<Document, ContentError> {
        let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (front_matter, body) = parse_front_matter(&raw, path)?;
        let route = self.route_for(path)?;

        Ok(Document {
            path: path.to_path_buf(),
            route,
            front_matter,
            body,
        })
    }

    fn route_for(&self, path: &Path) -> Result<String, ContentError> {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let rel = rel
            .to_str()
            .ok_or_else(|| ContentError::InvalidPath(path.to_path_buf()))?;
        let rel = rel.replace('\\', "/");
        Ok(rel.strip_suffix(".md").unwrap_or(&rel).to_string())
    }
}

/// The newest `count` non-draft documents, newest first. Undated documents
/// sort last.
pub fn featured(documents: &[Document], count: usize) -> Vec<&Document> {
    let mut posts: Vec<&Document> = documents
        .iter()
        .filter(|d| !d.front_matter.draft)
        .collect();
    posts.sort_by(|a, b| b.front_matter.date.cmp(&a.front_matter.date));
    posts.truncate(count);
    posts
}

/// Front matter fence styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fence {
    /// YAML between `---` lines.
    Yaml,
    /// TOML between `+++` lines.
    Toml,
}

/// Split a raw document into its fence style, front matter header, and body.
///
/// Returns None when the document does not open with a front matter fence.
fn split_front_matter(raw: &str) -> Option<(Fence, &str, &str)> {
    let raw = raw.trim_start_matches('\u{feff}');
    let (fence, close) = if raw.starts_with("---") {
        (Fence::Yaml, "\n---")
    } else if raw.starts_with("+++") {
        (Fence::Toml, "\n+++")
    } else {
        return None;
    };

    // The opening fence must be a line of its own.
    let rest = raw[3..].strip_prefix('\r').unwrap_or(&raw[3..]);
    let rest = rest.strip_prefix('\n')?;

    let end = rest.find(close)?;
    let header = rest[..end].trim_end_matches('\r');
    let body = rest[end + close.len()..].trim_start_matches(['\r', '\n']);
    Some((fence, header, body))
}

fn parse_front_matter(raw: &str, path: &Path) -> Result<(FrontMatter, String), ContentError> {
    let Some((fence, header, body)) = split_front_matter(raw) else {
        return Err(ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: "missing front matter".to_string(),
        });
    };

    let front_matter = match fence {
        Fence::Yaml => serde_yml::from_str(header).map_err(|e| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        Fence::Toml => toml::from_str(header).map_err(|e| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
    };

    Ok((front_matter, body.to_string()))
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::fs;

    use super::*;

    fn write_post(dir: &Path, name: &str, contents: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn doc(route: &str, date: Option<&str>, draft: bool) -> Document {
        Document {
            path: PathBuf::from(format!("{route}.md")),
            route: route.to_string(),
            front_matter: FrontMatter {
                title: route.to_string(),
                description: None,
                date: date.map(|d| d.parse().unwrap()),
                draft,
            },
            body: String::new(),
        }
    }

    #[test]
    fn splits_yaml_front_matter() {
        let raw = "---\ntitle: Hello\n---\n\nBody text.";
        let (fence, header, body) = split_front_matter(raw).unwrap();
        assert_eq!(fence, Fence::Yaml);
        assert_eq!(header, "title: Hello");
        assert_eq!(body, "Body text.");
    }

    #[test]
    fn splits_toml_front_matter() {
        let raw = "+++\ntitle = \"Hello\"\n+++\nBody.";
        let (fence, header, body) = split_front_matter(raw).unwrap();
        assert_eq!(fence, Fence::Toml);
        assert_eq!(header, "title = \"Hello\"");
        assert_eq!(body, "Body.");
    }

    #[test]
    fn horizontal_rule_is_not_a_fence() {
        assert!(split_front_matter("----\nnot front matter").is_none());
        assert!(split_front_matter("plain text").is_none());
    }

    #[test]
    fn enumerates_markdown_files_with_routes() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "first.md",
            "---\ntitle: First\ndescription: One\n---\nHello.",
        );
        write_post(
            dir.path(),
            "2024/nested.md",
            "---\ntitle: Nested\n---\nDeep.",
        );
        write_post(dir.path(), "ignored.txt", "not markdown");

        let source = ContentSource::new(dir.path());
        let docs: Vec<_> = source.documents().map(|d| d.unwrap()).collect();

        let routes: Vec<_> = docs.iter().map(|d| d.route.as_str()).collect();
        assert_eq!(routes, vec!["2024/nested", "first"]);
        assert_eq!(docs[1].front_matter.title, "First");
        assert_eq!(docs[1].front_matter.description.as_deref(), Some("One"));
    }

    #[test]
    fn enumeration_restarts() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "a.md", "---\ntitle: A\n---\nBody");

        let source = ContentSource::new(dir.path());
        assert_eq!(source.documents().count(), 1);
        assert_eq!(source.documents().count(), 1);
    }

    #[test]
    fn malformed_document_is_an_isolated_error() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "bad.md", "---\ntitle: [unclosed\n---\nBody");
        write_post(dir.path(), "good.md", "---\ntitle: Good\n---\nBody");

        let source = ContentSource::new(dir.path());
        let results: Vec<_> = source.documents().collect();

        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0],
            Err(ContentError::FrontMatter { .. })
        ));
        assert_eq!(results[1].as_ref().unwrap().front_matter.title, "Good");
    }

    #[test]
    fn document_without_front_matter_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "plain.md", "Just some text.");

        let source = ContentSource::new(dir.path());
        let result = source.documents().next().unwrap();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("missing front matter"));
    }

    #[test]
    fn toml_front_matter_parses() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "toml.md",
            "+++\ntitle = \"Hello\"\ndraft = true\n+++\nBody",
        );

        let source = ContentSource::new(dir.path());
        let doc = source.documents().next().unwrap().unwrap();
        assert_eq!(doc.front_matter.title, "Hello");
        assert!(doc.front_matter.draft);
    }

    #[test]
    fn body_renders_to_html() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "md.md", "---\ntitle: T\n---\n# Heading\n\n*em*");

        let source = ContentSource::new(dir.path());
        let doc = source.documents().next().unwrap().unwrap();
        let html = doc.body_html();
        assert!(html.contains("<h1>"));
        assert!(html.contains("<em>em</em>"));
    }

    #[test]
    fn featured_excludes_drafts_and_sorts_newest_first() {
        let docs = vec![
            doc("old", Some("2020-01-01T00:00:00Z"), false),
            doc("draft", Some("2024-06-01T00:00:00Z"), true),
            doc("new", Some("2024-01-01T00:00:00Z"), false),
            doc("undated", None, false),
            doc("mid", Some("2022-01-01T00:00:00Z"), false),
        ];

        let top = featured(&docs, 2);
        let routes: Vec<_> = top.iter().map(|d| d.route.as_str()).collect();
        assert_eq!(routes, vec!["new", "mid"]);
    }

    #[test]
    fn featured_handles_short_lists() {
        let docs = vec![doc("only", None, false)];
        assert_eq!(featured(&docs, 4).len(), 1);
        assert!(featured(&[], 4).is_empty());
    }
}
