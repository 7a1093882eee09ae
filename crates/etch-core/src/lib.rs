//! etch-core - document tree model and Markdown codec
//!
//! This crate provides the canonical node tree for an etch document and the
//! bidirectional Markdown codec over it. It is consumed by the `etch` crate
//! (sanitizer, input rules, pipeline service) and by the document runtime.
//!
//! # Architecture
//!
//! ```text
//! Markdown String ──parse───▶ ┌───────────┐
//!                             │           │ ──serialize──▶ Markdown String
//! Input rules / importer ────▶│ Node tree │
//!                             └───────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use etch_core::{to_markdown, FormatMask, MarkdownOptions, Node};
//!
//! let doc = vec![
//!     Node::heading(1, vec![Node::text("Hello World")]),
//!     Node::paragraph(vec![
//!         Node::text("This is "),
//!         Node::styled("bold", FormatMask::BOLD),
//!         Node::text(" text."),
//!     ]),
//! ];
//!
//! let markdown = to_markdown(&doc, &MarkdownOptions::default());
//! assert_eq!(markdown, "# Hello World\n\nThis is **bold** text.");
//! ```

mod format;
mod node;
mod options;
mod parse;
mod serialize;

pub use format::FormatMask;
pub use node::{CalloutColor, ListItem, ListKind, Node, TableCell, TableRow};
pub use options::MarkdownOptions;
pub use parse::{from_markdown, parse_inline};
pub use serialize::to_markdown;
