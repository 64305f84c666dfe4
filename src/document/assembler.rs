//! Document assembler
//!
//! Folds the ordered list of per-page chapter records into a single
//! [`Document`]: assets are deduplicated and renumbered globally, content
//! asset references are rewritten to local identifiers, and a table of
//! contents is generated one-to-one with chapters.
//!
//! This runs as a single-threaded pass after all concurrent fetching has
//! completed, so the rewrite map needs no locking.

use crate::document::{
    BookMetadata, Chapter, ChapterRecord, Document, DocumentAsset, TocEntry,
};
use std::collections::HashMap;
use url::Url;

/// Assembles crawled chapter records into one document
///
/// Chapters are walked in crawl-discovery order and never re-sorted. The
/// first time an asset URL is seen across any chapter it is assigned the
/// next local identifier from a monotonically increasing counter; later
/// occurrences of the same URL reuse that identifier, so an image
/// referenced from three chapters is stored once. References whose fetch
/// failed keep their original remote URL as a fallback.
pub fn assemble(metadata: BookMetadata, records: Vec<ChapterRecord>) -> Document {
    let mut assets: Vec<DocumentAsset> = Vec::new();
    let mut rewrite_map: HashMap<String, String> = HashMap::new();
    let mut counter = 0usize;

    // First pass: claim local identifiers in first-seen order across all
    // chapters, dropping duplicate payloads.
    let mut partials: Vec<(Url, String, String)> = Vec::with_capacity(records.len());
    for record in records {
        let ChapterRecord {
            source_url,
            title,
            content,
            images: _,
            assets: fetched,
        } = record;

        for asset in fetched {
            if rewrite_map.contains_key(&asset.original_url) {
                continue;
            }
            counter += 1;
            let local_id = format!("images/img_{}.{}", counter, asset.media_type.extension());
            rewrite_map.insert(asset.original_url.clone(), local_id.clone());
            assets.push(DocumentAsset {
                local_id,
                original_url: asset.original_url,
                bytes: asset.bytes,
                media_type: asset.media_type,
            });
        }

        partials.push((source_url, title, content));
    }

    tracing::debug!(
        "Assembled asset namespace: {} distinct assets across {} chapters",
        assets.len(),
        partials.len()
    );

    // Second pass: rewrite every reference once the map is complete, so a
    // chapter can reference an asset first fetched by a later chapter.
    let chapters: Vec<Chapter> = partials
        .into_iter()
        .map(|(source_url, title, content)| Chapter {
            source_url,
            title,
            content: rewrite_asset_refs(content, &rewrite_map),
        })
        .collect();

    let toc = chapters
        .iter()
        .enumerate()
        .map(|(chapter_index, chapter)| TocEntry {
            title: chapter.title.clone(),
            chapter_index,
        })
        .collect();

    Document {
        metadata,
        chapters,
        assets,
        toc,
    }
}

/// Rewrites `src` references from remote URLs to local identifiers
///
/// Serialized content carries attribute values with `&` escaped as `&amp;`,
/// so both the raw and the escaped spelling of each URL are replaced.
fn rewrite_asset_refs(mut content: String, rewrite_map: &HashMap<String, String>) -> String {
    for (original, local_id) in rewrite_map {
        let replacement = format!("src=\"{}\"", local_id);
        content = content.replace(&format!("src=\"{}\"", original), &replacement);
        if original.contains('&') {
            let escaped = original.replace('&', "&amp;");
            content = content.replace(&format!("src=\"{}\"", escaped), &replacement);
        }
    }
    content
}
