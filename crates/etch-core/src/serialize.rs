//! Tree to Markdown serialization
//!
//! Converts a node sequence into Markdown text. Serialization is total over
//! any tree satisfying the model invariants: inline nodes appearing in
//! block position serialize as inline text, and container nodes appearing
//! in inline position fall back to their plain text content.
//!
//! Underline has no Markdown equivalent and is dropped; multi-bit masks
//! serialize as nested markers even though the parser only reconstructs
//! single-bit spans.

use crate::format::FormatMask;
use crate::node::{ListKind, Node, TableRow};
use crate::options::MarkdownOptions;

/// Serialize a block sequence to Markdown.
///
/// Blocks are joined with one blank line between them.
pub fn to_markdown(nodes: &[Node], options: &MarkdownOptions) -> String {
    nodes
        .iter()
        .map(|node| serialize_block(node, options))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn serialize_block(node: &Node, options: &MarkdownOptions) -> String {
    match node {
        Node::Root(children) => to_markdown(children, options),

        Node::Paragraph(children) => serialize_inlines(children, options),

        Node::Heading { level, children } => {
            format!(
                "{} {}",
                "#".repeat(usize::from(*level)),
                serialize_inlines(children, options)
            )
        }

        Node::Quote(children) => format!("> {}", serialize_inlines(children, options)),

        Node::Divider => "---".to_string(),

        Node::List { kind, items } => {
            let lines: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let content = serialize_inlines(&item.children, options);
                    match kind {
                        ListKind::Bullet => {
                            format!("{} {}", options.bullet_list_marker, content)
                        }
                        ListKind::Number => format!("{}. {}", i + 1, content),
                        ListKind::Check => {
                            let state = if item.checked.unwrap_or(false) { 'x' } else { ' ' };
                            format!("{} [{}] {}", options.bullet_list_marker, state, content)
                        }
                    }
                })
                .collect();
            lines.join("\n")
        }

        Node::Table(rows) => serialize_table(rows, options),

        Node::CodeBlock { code, language } => {
            format!("{fence}{language}\n{code}\n{fence}", fence = options.fence)
        }

        Node::Callout { emoji, children, .. } => {
            let body = children
                .iter()
                .map(|child| serialize_block(child, options))
                .collect::<Vec<_>>()
                .join("\n");
            let mut lines = body.lines();
            let first = lines.next().unwrap_or("");
            let mut out = format!("> [!{}] {}", emoji, first);
            for line in lines {
                out.push_str("\n> ");
                out.push_str(line);
            }
            out
        }

        Node::Image { src, alt } => format!("![{}]({})", alt, src),

        // Inline nodes in block position serialize as a bare line.
        Node::Link { .. } | Node::Text { .. } | Node::Mention { .. } => {
            serialize_inline(node, options)
        }
    }
}

fn serialize_table(rows: &[TableRow], options: &MarkdownOptions) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| serialize_inlines(&cell.children, options).replace('|', "\\|"))
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));

        // Separator row after the header
        if i == 0 {
            let dashes = vec!["---"; row.cells.len()];
            lines.push(format!("| {} |", dashes.join(" | ")));
        }
    }
    lines.join("\n")
}

fn serialize_inlines(nodes: &[Node], options: &MarkdownOptions) -> String {
    nodes
        .iter()
        .map(|node| serialize_inline(node, options))
        .collect()
}

fn serialize_inline(node: &Node, options: &MarkdownOptions) -> String {
    match node {
        Node::Text { content, format } => wrap_format(content, *format),

        Node::Link { url, children } => {
            format!("[{}]({})", serialize_inlines(children, options), url)
        }

        Node::Image { src, alt } => format!("![{}]({})", alt, src),

        // Mentions carry external identity; only the visible label survives.
        Node::Mention { label, trigger, .. } => format!("{}{}", trigger, label),

        // Container nodes in inline position degrade to their text content.
        other => other.text_content(),
    }
}

/// Wrap text in the markers for its active format bits.
///
/// Inline code is independent of the other bits; bold, italic and
/// strikethrough nest in a fixed order. Underline is dropped.
fn wrap_format(content: &str, format: FormatMask) -> String {
    if format.contains(FormatMask::CODE) {
        return format!("`{}`", content);
    }
    let mut text = content.to_string();
    if format.contains(FormatMask::BOLD) {
        text = format!("**{}**", text);
    }
    if format.contains(FormatMask::ITALIC) {
        text = format!("*{}*", text);
    }
    if format.contains(FormatMask::STRIKETHROUGH) {
        text = format!("~~{}~~", text);
    }
    text
}
