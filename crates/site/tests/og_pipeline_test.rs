#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Preview image pipeline tests.
//!
//! Run entirely offline: font bytes come from a prefilled set instead of
//! the network, and the logo is a generated test image.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};
use vetrina_site::content::ContentSource;
use vetrina_site::og::{
    CANVAS_HEIGHT, CANVAS_WIDTH, FontSet, OgGenerator, OgImageEntry, OgManifest, collect_entries,
};

fn write_post(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A small solid-red PNG standing in for the site logo.
fn write_logo(dir: &Path) -> PathBuf {
    let img = RgbImage::from_pixel(32, 32, image::Rgb([255, 0, 0]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    let path = dir.join("logo.png");
    fs::write(&path, buf.into_inner()).unwrap();
    path
}

/// Point every entry at the test logo.
fn use_logo(entries: &mut [OgImageEntry], logo: &Path) {
    for entry in entries {
        entry.options.logo.path = logo.to_path_buf();
    }
}

/// A font set covering every URL the entries name.
fn fonts_for(entries: &[OgImageEntry]) -> FontSet {
    FontSet::from_pairs(
        entries
            .iter()
            .flat_map(|e| e.options.fonts.iter())
            .map(|url| (url.clone(), vec![0u8; 16])),
    )
}

#[tokio::test]
async fn full_bundle_for_a_content_tree() {
    let content = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_post(
        content.path(),
        "hello.md",
        "---\ntitle: Hello\ndescription: World\n---\nBody.",
    );
    write_post(
        content.path(),
        "2024/deep.md",
        "---\ntitle: Deep\ndescription: Nested\n---\nBody.",
    );

    let source = ContentSource::new(content.path());
    let (mut entries, failures) = collect_entries(&source);
    assert!(failures.is_empty());
    assert_eq!(entries.len(), 2);

    // Exactly one descriptor carries the Hello/World front matter.
    let hello: Vec<_> = entries.iter().filter(|e| e.options.title == "Hello").collect();
    assert_eq!(hello.len(), 1);
    assert_eq!(hello[0].route, "hello");
    assert_eq!(hello[0].options.description, "World");

    let logo = write_logo(out.path());
    use_logo(&mut entries, &logo);
    let fonts = fonts_for(&entries);

    let generator = OgGenerator::new(out.path()).max_renders(2);
    let report = generator.generate(entries, &fonts).await.unwrap();

    assert_eq!(report.generated, 2);
    assert!(report.is_clean());
    assert_eq!(report.fonts, 2);

    let og = out.path().join("og");
    for route in ["hello", "2024/deep"] {
        assert!(og.join(format!("{route}.png")).exists(), "{route}.png");
        assert!(og.join(format!("{route}.json")).exists(), "{route}.json");
    }
    assert!(og.join("fonts/anybody-latin-800-normal.ttf").exists());
    assert!(og.join("fonts/poppins-latin-400-normal.ttf").exists());

    // The canvas is full-size and non-empty.
    let png = fs::read(og.join("hello.png")).unwrap();
    assert!(!png.is_empty());
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), CANVAS_WIDTH);
    assert_eq!(decoded.height(), CANVAS_HEIGHT);

    // The descriptor round-trips with the document's texts.
    let descriptor: serde_json::Value =
        serde_json::from_slice(&fs::read(og.join("hello.json")).unwrap()).unwrap();
    assert_eq!(descriptor["title"], "Hello");
    assert_eq!(descriptor["description"], "World");
    assert_eq!(descriptor["font"]["title"]["family"], "Anybody");
    assert_eq!(descriptor["font"]["description"]["family"], "Poppins");

    // The manifest maps every generated route.
    let manifest: OgManifest =
        serde_json::from_slice(&fs::read(og.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest.routes.len(), 2);
    assert_eq!(manifest.routes["hello"].image, "og/hello.png");
    assert_eq!(manifest.routes["2024/deep"].descriptor, "og/2024/deep.json");
}

#[tokio::test]
async fn missing_font_fails_the_document_without_fallback() {
    let content = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_post(
        content.path(),
        "hello.md",
        "---\ntitle: Hello\ndescription: World\n---\nBody.",
    );

    let source = ContentSource::new(content.path());
    let (mut entries, _) = collect_entries(&source);
    let logo = write_logo(out.path());
    use_logo(&mut entries, &logo);

    // No fonts fetched at all.
    let report = OgGenerator::new(out.path())
        .generate(entries, &FontSet::default())
        .await
        .unwrap();

    assert_eq!(report.generated, 0);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].route, "hello");
    assert!(report.failures[0].reason.contains("unavailable"));
    assert!(!out.path().join("og/hello.png").exists());
}

#[tokio::test]
async fn bad_document_is_isolated_from_the_batch() {
    let content = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_post(content.path(), "bad.md", "---\ntitle: [unclosed\n---\nBody.");
    write_post(
        content.path(),
        "good.md",
        "---\ntitle: Good\ndescription: Post\n---\nBody.",
    );

    let source = ContentSource::new(content.path());
    let (mut entries, failures) = collect_entries(&source);
    assert_eq!(entries.len(), 1);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].route.ends_with("bad.md"));
    assert!(failures[0].reason.contains("front matter"));

    let logo = write_logo(out.path());
    use_logo(&mut entries, &logo);
    let fonts = fonts_for(&entries);

    let report = OgGenerator::new(out.path()).generate(entries, &fonts).await.unwrap();
    assert_eq!(report.generated, 1);
    assert!(out.path().join("og/good.png").exists());
}

#[tokio::test]
async fn missing_logo_fails_per_document() {
    let content = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_post(
        content.path(),
        "hello.md",
        "---\ntitle: Hello\n---\nBody.",
    );

    let source = ContentSource::new(content.path());
    let (mut entries, _) = collect_entries(&source);
    let fonts = fonts_for(&entries);

    // Logo path points nowhere.
    for entry in &mut entries {
        entry.options.logo.path = out.path().join("nope.jpg");
    }

    let report = OgGenerator::new(out.path()).generate(entries, &fonts).await.unwrap();
    assert_eq!(report.generated, 0);
    assert_eq!(report.failed(), 1);
    assert!(report.failures[0].reason.contains("failed to load"));
}
