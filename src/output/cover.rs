//! Cover generation
//!
//! Produces a simple typographic cover as an SVG file. SVG keeps the
//! renderer free of raster encoding while remaining usable by any ebook
//! tooling downstream.

use crate::document::BookMetadata;
use crate::output::traits::{CoverRenderer, OutputResult};
use std::fs;
use std::path::{Path, PathBuf};

const COVER_WIDTH: u32 = 600;
const COVER_HEIGHT: u32 = 800;

/// Renders a typographic SVG cover from document metadata
#[derive(Debug, Default, Clone)]
pub struct SvgCoverRenderer;

impl CoverRenderer for SvgCoverRenderer {
    fn render_cover(&self, metadata: &BookMetadata, out_dir: &Path) -> OutputResult<PathBuf> {
        fs::create_dir_all(out_dir)?;
        let path = out_dir.join("cover.svg");
        fs::write(&path, render_svg(metadata))?;
        Ok(path)
    }
}

fn render_svg(metadata: &BookMetadata) -> String {
    let title_lines = wrap_text(&metadata.title, 20);
    let mut text = String::new();

    let mut y = 300;
    for line in &title_lines {
        text.push_str(&format!(
            "<text x=\"300\" y=\"{}\" text-anchor=\"middle\" font-size=\"40\" \
             font-family=\"Georgia, serif\" fill=\"#222222\">{}</text>\n",
            y,
            escape_xml(line)
        ));
        y += 52;
    }

    text.push_str(&format!(
        "<text x=\"300\" y=\"{}\" text-anchor=\"middle\" font-size=\"24\" \
         font-family=\"Georgia, serif\" font-style=\"italic\" fill=\"#555555\">{}</text>\n",
        y + 60,
        escape_xml(&metadata.author)
    ));

    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\">\n\
         <rect width=\"{w}\" height=\"{h}\" fill=\"#f4f1ea\"/>\n\
         <rect x=\"30\" y=\"30\" width=\"{iw}\" height=\"{ih}\" fill=\"none\" \
         stroke=\"#999999\" stroke-width=\"2\"/>\n\
         {text}</svg>\n",
        w = COVER_WIDTH,
        h = COVER_HEIGHT,
        iw = COVER_WIDTH - 60,
        ih = COVER_HEIGHT - 60,
        text = text
    )
}

/// Greedy word wrap; a single overlong word becomes its own line
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
