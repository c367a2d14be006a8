//! # htmltomd
//!
//! Convert paginated HTML documents to Markdown.
//!
//! ## Pipeline
//!
//! ```text
//! HTML ─▶ parse ─▶ page breaks ─▶ media ─▶ links ─▶ headings ─▶ render ─▶ clean ─▶ Markdown
//! ```
//!
//! - Elements with the `p-Pagina` class token get a `<!-- Página N -->`
//!   comment in front of them, `N` being their trimmed text.
//! - `img`, `video` and `audio` are removed with everything inside them.
//! - Links become their plain text.
//! - `h1` becomes `#`, `h2` becomes `##`, `h3` to `h6` become `###`.
//! - Everything else renders as plain text lines; no emphasis, list or link
//!   syntax is produced.
//!
//! Each call owns its tree from parse to render; nothing is shared between
//! calls.
//!
//! ## Example
//!
//! ```rust
//! let markdown = htmltomd::convert(
//!     r#"<h1>Título</h1><span class="p-Pagina">12 e 13</span><p>Texto com <a href="x">link</a>.</p>"#,
//! )
//! .unwrap();
//!
//! assert_eq!(markdown, "# Título\n\n<!-- Página 12 e 13 -->\n\nTexto com link.");
//! ```

mod clean;
pub mod html;
pub mod node;
mod render;
pub mod rules;
mod service;
mod utilities;

pub use clean::clean_markdown;
pub use html::parse_html;
pub use node::{Document, Element, Node, PAGE_MARKER_CLASS};
pub use render::render_markdown;
pub use rules::{flatten_links, mark_page_breaks, normalize_headers, remove_media};
pub use service::{check_size, convert, Converter, ConverterOptions};
pub use utilities::{heading_prefix, role_of, TagRole};

/// Error type for conversion
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("input is not valid UTF-8 text: {0}")]
    DecodeError(#[from] std::str::Utf8Error),

    #[error("could not parse HTML: {0}")]
    ParseError(String),

    #[error("input is {size} bytes, above the limit of {limit} bytes")]
    SizeLimitExceeded { size: u64, limit: u64 },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
