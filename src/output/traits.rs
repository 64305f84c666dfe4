//! Output renderer traits and types
//!
//! This module defines the trait interface for document renderers and the
//! error type shared by output operations. Renderers consume an assembled
//! document; they never reach back to the network.

use crate::document::{BookMetadata, Document};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Renders an assembled document into a distributable form on disk
pub trait DocumentRenderer {
    /// Short name of the produced format, for logs and CLI output
    fn format_name(&self) -> &'static str;

    /// Renders the document under the given directory
    ///
    /// Returns the path of the produced artifact.
    fn render(&self, document: &Document, out_dir: &Path) -> OutputResult<PathBuf>;
}

/// Renders a cover image for a document
pub trait CoverRenderer {
    /// Renders a cover under the given directory, returning its path
    fn render_cover(&self, metadata: &BookMetadata, out_dir: &Path) -> OutputResult<PathBuf>;
}
