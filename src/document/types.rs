//! Core data types shared between the crawler and the assembler

use url::Url;

/// Metadata describing the whole book
///
/// Extracted from the first successfully fetched page; per-chapter titles
/// come from each page's own metadata.
#[derive(Debug, Clone)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub description: String,
    pub publisher: String,
    pub date: String,
    pub language: String,
    pub keywords: String,
    pub source_url: String,
}

impl Default for BookMetadata {
    fn default() -> Self {
        Self {
            title: "Untitled Document".to_string(),
            author: "Unknown Author".to_string(),
            description: String::new(),
            publisher: String::new(),
            date: String::new(),
            language: "en".to_string(),
            keywords: String::new(),
            source_url: String::new(),
        }
    }
}

/// An image reference discovered inside extracted content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Absolute URL of the image
    pub url: String,

    /// Alt text, possibly empty
    pub alt: String,
}

/// Image media type, sniffed from leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl MediaType {
    /// Sniffs the media type from the magic number at the start of the body
    ///
    /// The HTTP content-type header is not trusted for this; unrecognized
    /// content defaults to JPEG.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"\x89PNG") {
            Self::Png
        } else if bytes.starts_with(b"\xff\xd8\xff") {
            Self::Jpeg
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Self::Gif
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Self::Webp
        } else {
            Self::Jpeg
        }
    }

    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    /// MIME type string
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// A successfully downloaded image belonging to one page
///
/// Assets that failed to download are simply absent; absence is an
/// omission, not an error.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub original_url: String,
    pub bytes: Vec<u8>,
    pub media_type: MediaType,
}

/// One crawled page, ready for assembly
///
/// Created exactly once per successfully fetched page and immutable after
/// creation; ownership passes from the crawl controller to the assembler.
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    /// The page this chapter came from
    pub source_url: Url,

    /// Chapter title from the page's own metadata
    pub title: String,

    /// Extracted content subtree, serialized as markup with absolute
    /// image and link URLs
    pub content: String,

    /// Ordered (absolute image URL, alt text) pairs found in the content
    pub images: Vec<ImageRef>,

    /// The subset of `images` that downloaded successfully
    pub assets: Vec<FetchedAsset>,
}

/// An asset stored in the assembled document under its local identifier
#[derive(Debug, Clone)]
pub struct DocumentAsset {
    /// Document-scoped identifier, e.g. `images/img_3.png`
    pub local_id: String,

    /// The remote URL this asset was fetched from
    pub original_url: String,

    pub bytes: Vec<u8>,
    pub media_type: MediaType,
}

/// A chapter of the assembled document, asset references rewritten
#[derive(Debug, Clone)]
pub struct Chapter {
    pub source_url: Url,
    pub title: String,
    pub content: String,
}

/// One table-of-contents entry; entries map one-to-one onto chapters
#[derive(Debug, Clone)]
pub struct TocEntry {
    pub title: String,

    /// Zero-based index into `Document::chapters`
    pub chapter_index: usize,
}

/// The fully assembled document handed to renderers
///
/// Self-contained: after assembly no external URLs remain in content except
/// where an asset fetch failed, in which case the original remote URL is
/// left as a fallback reference.
#[derive(Debug, Clone)]
pub struct Document {
    pub metadata: BookMetadata,
    pub chapters: Vec<Chapter>,
    pub assets: Vec<DocumentAsset>,
    pub toc: Vec<TocEntry>,
}

impl Document {
    /// Looks up an asset by its local identifier
    pub fn asset(&self, local_id: &str) -> Option<&DocumentAsset> {
        self.assets.iter().find(|a| a.local_id == local_id)
    }
}
