//! Document tree model
//!
//! This module defines the canonical node tree shared by the sanitizer
//! output importer, the input-rule engine and the Markdown codec. Nodes own
//! their children outright: the tree has no parent pointers, no sharing and
//! no cycles, and traversal is strictly top-down.

use crate::format::FormatMask;

/// Kind discriminator for [`Node::List`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Unordered list rendered with bullet markers
    Bullet,
    /// Ordered list rendered with 1-based indices
    Number,
    /// Task list whose items carry a checked state
    Check,
}

/// Background preset for [`Node::Callout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalloutColor {
    #[default]
    Default,
    Blue,
    Green,
    Yellow,
    Red,
    Purple,
}

/// One entry of a [`Node::List`]
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// Checked state; only meaningful inside a [`ListKind::Check`] list
    pub checked: Option<bool>,
    /// Inline content of the item
    pub children: Vec<Node>,
}

impl ListItem {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            checked: None,
            children,
        }
    }

    pub fn checked(checked: bool, children: Vec<Node>) -> Self {
        Self {
            checked: Some(checked),
            children,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.children.iter().all(|n| n.is_blank())
    }
}

/// One row of a [`Node::Table`]
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }
}

/// One cell of a [`TableRow`]
///
/// Ragged tables are legal at the model level; column symmetry is a
/// rendering concern.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub colspan: u32,
    pub rowspan: u32,
    pub background_color: Option<String>,
    pub children: Vec<Node>,
}

impl TableCell {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            colspan: 1,
            rowspan: 1,
            background_color: None,
            children,
        }
    }
}

/// A node of the document tree
///
/// The unit all transformations construct and consume. Children lists
/// preserve insertion order; order is document reading order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Document container; exactly one per document, children are the
    /// top-level blocks
    Root(Vec<Node>),

    /// Paragraph containing inline content
    Paragraph(Vec<Node>),

    /// Heading with level 1-6 and inline content
    Heading { level: u8, children: Vec<Node> },

    /// Block quote containing inline content
    Quote(Vec<Node>),

    /// Horizontal rule; has no children and cannot host a cursor
    Divider,

    /// Bullet, numbered or check list
    List { kind: ListKind, items: Vec<ListItem> },

    /// Table of rows; each row should have at least one cell
    Table(Vec<TableRow>),

    /// Code block holding raw text, not inline children
    CodeBlock { code: String, language: String },

    /// Highlighted block with an emoji marker and a color preset
    Callout {
        emoji: String,
        color: CalloutColor,
        children: Vec<Node>,
    },

    /// Image reference
    Image { src: String, alt: String },

    /// Inline link containing inline children
    Link { url: String, children: Vec<Node> },

    /// Inline text run with its formatting mask
    Text { content: String, format: FormatMask },

    /// Atomic inline mention; not decomposable into text
    Mention {
        id: String,
        label: String,
        trigger: char,
    },
}

impl Node {
    /// Create an unformatted text node
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
            format: FormatMask::empty(),
        }
    }

    /// Create a text node with the given format mask
    pub fn styled(content: impl Into<String>, format: FormatMask) -> Self {
        Node::Text {
            content: content.into(),
            format,
        }
    }

    /// Create a paragraph node
    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph(children)
    }

    /// Create a heading node; levels outside 1-6 are clamped
    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Node::Heading {
            level: level.clamp(1, 6),
            children,
        }
    }

    /// Get the plain text content of this node and its descendants
    pub fn text_content(&self) -> String {
        match self {
            Node::Root(children)
            | Node::Paragraph(children)
            | Node::Heading { children, .. }
            | Node::Quote(children)
            | Node::Callout { children, .. }
            | Node::Link { children, .. } => {
                children.iter().map(|n| n.text_content()).collect()
            }
            Node::List { items, .. } => items
                .iter()
                .flat_map(|item| item.children.iter())
                .map(|n| n.text_content())
                .collect(),
            Node::Table(rows) => rows
                .iter()
                .flat_map(|row| row.cells.iter())
                .flat_map(|cell| cell.children.iter())
                .map(|n| n.text_content())
                .collect(),
            Node::CodeBlock { code, .. } => code.clone(),
            Node::Image { alt, .. } => alt.clone(),
            Node::Text { content, .. } => content.clone(),
            Node::Mention { label, .. } => label.clone(),
            Node::Divider => String::new(),
        }
    }

    /// Check if this node is empty/blank
    pub fn is_blank(&self) -> bool {
        match self {
            Node::Root(children)
            | Node::Paragraph(children)
            | Node::Heading { children, .. }
            | Node::Quote(children)
            | Node::Callout { children, .. }
            | Node::Link { children, .. } => children.iter().all(|n| n.is_blank()),
            Node::List { items, .. } => items.iter().all(|i| i.is_blank()),
            Node::Table(rows) => rows
                .iter()
                .all(|r| r.cells.iter().all(|c| c.children.iter().all(|n| n.is_blank()))),
            Node::CodeBlock { code, .. } => code.trim().is_empty(),
            Node::Text { content, .. } => content.trim().is_empty(),
            Node::Divider | Node::Image { .. } | Node::Mention { .. } => false,
        }
    }
}
