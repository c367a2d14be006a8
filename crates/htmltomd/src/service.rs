//! Converter - the main entry point for HTML to Markdown conversion.

use tracing::{debug, debug_span};

use crate::clean::clean_markdown;
use crate::html::parse_html;
use crate::node::Document;
use crate::render::render_markdown;
use crate::rules::rewrite;
use crate::{ConvertError, Result};

/// Options for Converter
#[derive(Debug, Clone, Default)]
pub struct ConverterOptions {
    /// Reject byte input larger than this. `None` means no limit.
    pub max_input_bytes: Option<u64>,
}

/// Runs parse, rewrite, render and clean on one document per call.
///
/// Holds no per-document state, so one converter can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConverterOptions,
}

impl Converter {
    /// Create a new Converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Converter with custom options
    pub fn with_options(options: ConverterOptions) -> Self {
        Self { options }
    }

    /// Get the current options
    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Convert HTML text to Markdown
    pub fn convert(&self, html: &str) -> Result<String> {
        let span = debug_span!("convert", input_len = html.len());
        let _guard = span.enter();

        let doc = parse_html(html)?;
        debug!(depth = doc.depth(), "parsed document");
        Ok(self.convert_document(doc))
    }

    /// Convert raw bytes, which must be UTF-8, to Markdown
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<String> {
        if let Some(limit) = self.options.max_input_bytes {
            check_size(bytes.len() as u64, limit)?;
        }
        let html = std::str::from_utf8(bytes)?;
        self.convert(html)
    }

    /// Rewrite, render and clean an already parsed document
    pub fn convert_document(&self, mut doc: Document) -> String {
        rewrite(&mut doc);
        let markdown = render_markdown(&doc);
        clean_markdown(&markdown)
    }
}

/// Reject inputs above `limit` bytes
pub fn check_size(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(ConvertError::SizeLimitExceeded { size, limit });
    }
    Ok(())
}

/// Convert HTML text to Markdown with default options
pub fn convert(html: &str) -> Result<String> {
    Converter::new().convert(html)
}
