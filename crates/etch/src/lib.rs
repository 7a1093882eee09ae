//! # etch
//!
//! Document transformation pipeline for a block-based rich-text editor.
//!
//! Three pure components share one tree model (re-exported from
//! [`etch_core`]):
//!
//! - **Sanitizer**: reduces untrusted pasted markup to a small safe
//!   vocabulary without losing semantic intent.
//! - **Input-rule engine**: watches the text of the block being typed into
//!   and decides when a prefix pattern (`"# "`, `"> "`, `` "```" ``, ...)
//!   should become a structural node.
//! - **Markdown codec**: lossy-but-faithful conversion between the node
//!   tree and Markdown text.
//!
//! All transformations are total, synchronous and free of shared state; the
//! live document is owned by the embedding runtime.
//!
//! ## Example
//!
//! ```rust
//! use etch::{Pipeline, RuleEffect};
//!
//! let pipeline = Pipeline::new();
//!
//! // Hostile paste comes out safe.
//! let safe = pipeline.sanitize("<b>Hi</b><script>alert(1)</script>");
//! assert_eq!(safe, "<strong>Hi</strong>");
//!
//! // A typed prefix becomes a structural node.
//! let matched = pipeline.try_match("# ", false).unwrap();
//! assert!(matches!(matched.effect, RuleEffect::Replace { .. }));
//!
//! // Markdown flows both ways.
//! let doc = pipeline.from_markdown("# Title\n\nBody");
//! assert_eq!(pipeline.to_markdown(&doc), "# Title\n\nBody");
//! ```

pub mod rules;
pub mod sanitize;
mod service;
mod utilities;

pub use etch_core::{
    from_markdown, parse_inline, to_markdown, CalloutColor, FormatMask, ListItem, ListKind,
    MarkdownOptions, Node, TableCell, TableRow,
};
pub use rules::{builtin_rules, InputRule, InputRules, RuleEffect, RuleMatch, DEFAULT_CODE_LANGUAGE};
pub use sanitize::{sanitize, sanitize_with_options, SanitizeOptions};
pub use service::Pipeline;
pub use utilities::*;

/// Error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum EtchError {
    /// A caller-supplied rule pattern failed to compile
    #[error("invalid rule pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, EtchError>;
