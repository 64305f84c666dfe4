//! Document model for the assembled book
//!
//! The crawl produces one [`ChapterRecord`] per successfully fetched page;
//! the assembler folds them into a single [`Document`] with a global asset
//! namespace. The `Document` is the one value handed to renderers.

mod assembler;
mod types;

pub use assembler::assemble;
pub use types::{
    BookMetadata, Chapter, ChapterRecord, Document, DocumentAsset, FetchedAsset, ImageRef,
    MediaType, TocEntry,
};
