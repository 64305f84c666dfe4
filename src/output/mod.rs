//! Output module for Webtome
//!
//! Renderers take an assembled document and write it to disk. The reference
//! renderer produces a single XHTML file plus an images directory; the
//! cover renderer produces an SVG title cover. Both sit behind traits so
//! other formats can slot in.

mod cover;
mod traits;
mod xhtml;

pub use cover::SvgCoverRenderer;
pub use traits::{CoverRenderer, DocumentRenderer, OutputError, OutputResult};
pub use xhtml::{slugify, XhtmlRenderer};
