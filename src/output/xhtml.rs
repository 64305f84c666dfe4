//! XHTML document rendering
//!
//! Writes an assembled document as a self-contained directory: one
//! `book.xhtml` with a title page, a table of contents, and every chapter,
//! plus an `images/` directory holding the fetched assets the markup
//! references by relative path.

use crate::document::Document;
use crate::output::traits::{DocumentRenderer, OutputResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Longest directory name derived from a document title
const MAX_SLUG_LEN: usize = 50;

const STYLESHEET: &str = "\
body { font-family: Georgia, serif; line-height: 1.6; max-width: 42em; margin: 0 auto; padding: 2em; }
h1, h2, h3 { font-family: Helvetica, Arial, sans-serif; line-height: 1.25; }
img { max-width: 100%; height: auto; }
.title-page { text-align: center; margin: 6em 0; }
.title-page .author { font-style: italic; }
.toc ol { line-height: 2; }
.chapter { page-break-before: always; }
.chapter .source { font-size: 0.8em; color: #666; }
";

/// Renders documents as a single XHTML file with an images directory
#[derive(Debug, Default, Clone)]
pub struct XhtmlRenderer;

impl DocumentRenderer for XhtmlRenderer {
    fn format_name(&self) -> &'static str {
        "xhtml"
    }

    fn render(&self, document: &Document, out_dir: &Path) -> OutputResult<PathBuf> {
        let book_dir = out_dir.join(slugify(&document.metadata.title));
        fs::create_dir_all(book_dir.join("images"))?;

        for asset in &document.assets {
            fs::write(book_dir.join(&asset.local_id), &asset.bytes)?;
        }

        let book_path = book_dir.join("book.xhtml");
        fs::write(&book_path, render_book(document))?;

        tracing::info!(
            "Wrote {} chapters and {} images to {}",
            document.chapters.len(),
            document.assets.len(),
            book_dir.display()
        );

        Ok(book_path)
    }
}

fn render_book(document: &Document) -> String {
    let meta = &document.metadata;
    let mut out = String::new();

    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\" lang=\"",
    );
    out.push_str(&escape_xml(&meta.language));
    out.push_str("\">\n<head>\n<title>");
    out.push_str(&escape_xml(&meta.title));
    out.push_str("</title>\n<style type=\"text/css\">\n");
    out.push_str(STYLESHEET);
    out.push_str("</style>\n</head>\n<body>\n");

    // Title page
    out.push_str("<div class=\"title-page\">\n<h1>");
    out.push_str(&escape_xml(&meta.title));
    out.push_str("</h1>\n<p class=\"author\">");
    out.push_str(&escape_xml(&meta.author));
    out.push_str("</p>\n");
    if !meta.publisher.is_empty() {
        out.push_str("<p class=\"publisher\">");
        out.push_str(&escape_xml(&meta.publisher));
        out.push_str("</p>\n");
    }
    if !meta.description.is_empty() {
        out.push_str("<p class=\"description\">");
        out.push_str(&escape_xml(&meta.description));
        out.push_str("</p>\n");
    }
    out.push_str("<p class=\"source\"><a href=\"");
    out.push_str(&escape_xml(&meta.source_url));
    out.push_str("\">");
    out.push_str(&escape_xml(&meta.source_url));
    out.push_str("</a></p>\n</div>\n");

    // Table of contents
    out.push_str("<div class=\"toc\">\n<h2>Contents</h2>\n<ol>\n");
    for entry in &document.toc {
        out.push_str(&format!(
            "<li><a href=\"#chapter-{}\">{}</a></li>\n",
            entry.chapter_index + 1,
            escape_xml(&entry.title)
        ));
    }
    out.push_str("</ol>\n</div>\n");

    // Chapters; content is already serialized markup, inserted as-is
    for (index, chapter) in document.chapters.iter().enumerate() {
        out.push_str(&format!(
            "<div class=\"chapter\" id=\"chapter-{}\">\n<h1>{}</h1>\n<p class=\"source\"><a href=\"{}\">{}</a></p>\n",
            index + 1,
            escape_xml(&chapter.title),
            escape_xml(chapter.source_url.as_str()),
            escape_xml(chapter.source_url.as_str())
        ));
        out.push_str(&chapter.content);
        out.push_str("\n</div>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Derives a filesystem-safe directory name from a document title
pub fn slugify(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_' || *c == ' ')
        .collect();

    // Truncate by characters, not bytes, so multibyte titles cannot split
    let slug: String = cleaned
        .trim()
        .replace(' ', "_")
        .chars()
        .take(MAX_SLUG_LEN)
        .collect();

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
