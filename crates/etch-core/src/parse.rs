//! Markdown parsing
//!
//! Converts Markdown text into a node sequence. Parsing is total: every
//! string has a defined parse. Blocks that match no structural pattern
//! degrade to paragraphs, and inline text with unmatched delimiters
//! degrades to literal plain text.
//!
//! The inline scanner produces single-bit format spans only; nested
//! Markdown markers are not reconstructed into multi-bit masks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format::FormatMask;
use crate::node::{CalloutColor, ListItem, ListKind, Node, TableCell, TableRow};

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#+)\s+(.*)$").unwrap());
static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```([A-Za-z0-9_+-]*)\s*$").unwrap());
static CALLOUT_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[!([^\]]+)\]\s*(.*)$").unwrap());
static CHECK_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]\s+\[([ xX])\]\s+(.*)$").unwrap());
static BULLET_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]\s+(.*)$").unwrap());
static NUMBER_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());
static DIVIDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-{3,}$").unwrap());
static IMAGE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^)]*)\)$").unwrap());
static TABLE_SEPARATOR_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:?-{3,}:?$").unwrap());

/// One inline token form per alternative; `**` must come before `*` so bold
/// is not misread as italic.
static INLINE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(?P<bold>.+?)\*\*|\*(?P<italic>[^*]+)\*|`(?P<code>[^`]+)`|~~(?P<strike>.+?)~~")
        .unwrap()
});

/// Parse Markdown text into a block sequence.
pub fn from_markdown(markdown: &str) -> Vec<Node> {
    split_blocks(markdown)
        .into_iter()
        .map(|block| match block {
            RawBlock::Fenced { language, code } => Node::CodeBlock { code, language },
            RawBlock::Lines(lines) => classify_block(&lines),
        })
        .collect()
}

/// A source segment awaiting classification
enum RawBlock {
    /// Fenced code region, kept whole across blank lines
    Fenced { language: String, code: String },
    /// Consecutive non-blank lines
    Lines(Vec<String>),
}

/// Split source into blocks on one-or-more blank lines, keeping fenced code
/// regions intact.
fn split_blocks(markdown: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut lines = markdown.lines();

    while let Some(line) = lines.next() {
        if let Some(caps) = FENCE_OPEN.captures(line) {
            if !current.is_empty() {
                blocks.push(RawBlock::Lines(std::mem::take(&mut current)));
            }
            let language = caps[1].to_string();
            let mut code_lines = Vec::new();
            for code_line in lines.by_ref() {
                if code_line.trim_end() == "```" {
                    break;
                }
                code_lines.push(code_line);
            }
            // An unterminated fence swallows the rest of the input.
            blocks.push(RawBlock::Fenced {
                language,
                code: code_lines.join("\n"),
            });
        } else if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(RawBlock::Lines(std::mem::take(&mut current)));
            }
        } else {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(RawBlock::Lines(current));
    }
    blocks
}

/// Classify one block by testing structural patterns in order, falling back
/// to a paragraph.
fn classify_block(lines: &[String]) -> Node {
    if let Some(caps) = HEADING.captures(&lines[0]) {
        // Levels beyond 6 clamp rather than fail.
        let level = caps[1].len().min(6) as u8;
        let mut content = caps[2].to_string();
        for line in &lines[1..] {
            content.push('\n');
            content.push_str(line);
        }
        return Node::Heading {
            level,
            children: parse_inline(&content),
        };
    }

    if lines[0].starts_with('>') {
        return parse_quote(lines);
    }

    if lines.iter().all(|l| l.trim_start().starts_with('|')) {
        return parse_table(lines);
    }

    if lines.len() == 1 {
        if DIVIDER.is_match(&lines[0]) {
            return Node::Divider;
        }
        if let Some(caps) = IMAGE_BLOCK.captures(&lines[0]) {
            return Node::Image {
                alt: caps[1].to_string(),
                src: caps[2].to_string(),
            };
        }
    }

    // Check items also match the bullet pattern, so they are tested first.
    if lines.iter().all(|l| CHECK_ITEM.is_match(l)) {
        let items = lines
            .iter()
            .map(|l| {
                let caps = CHECK_ITEM.captures(l).expect("line matched above");
                ListItem::checked(&caps[1] != " ", parse_inline(&caps[2]))
            })
            .collect();
        return Node::List {
            kind: ListKind::Check,
            items,
        };
    }

    if lines.iter().all(|l| BULLET_ITEM.is_match(l)) {
        return parse_list(lines, &BULLET_ITEM, ListKind::Bullet);
    }

    if lines.iter().all(|l| NUMBER_ITEM.is_match(l)) {
        return parse_list(lines, &NUMBER_ITEM, ListKind::Number);
    }

    Node::Paragraph(parse_inline(&lines.join("\n")))
}

fn parse_list(lines: &[String], pattern: &Regex, kind: ListKind) -> Node {
    let items = lines
        .iter()
        .map(|l| {
            let caps = pattern.captures(l).expect("line matched above");
            ListItem::new(parse_inline(&caps[1]))
        })
        .collect();
    Node::List { kind, items }
}

/// Parse a `>`-prefixed block into a quote, or a callout when the first
/// line carries the `[!emoji]` marker.
fn parse_quote(lines: &[String]) -> Node {
    let stripped: Vec<&str> = lines
        .iter()
        .map(|l| {
            let l = l.trim_start();
            l.strip_prefix("> ")
                .or_else(|| l.strip_prefix('>'))
                .unwrap_or(l)
        })
        .collect();

    if let Some(caps) = CALLOUT_HEAD.captures(stripped[0]) {
        let emoji = caps[1].to_string();
        let mut children = Vec::new();
        let first = caps[2].to_string();
        if !first.is_empty() {
            children.push(Node::Paragraph(parse_inline(&first)));
        }
        for line in &stripped[1..] {
            children.push(Node::Paragraph(parse_inline(line)));
        }
        return Node::Callout {
            emoji,
            color: CalloutColor::default(),
            children,
        };
    }

    Node::Quote(parse_inline(&stripped.join("\n")))
}

fn parse_table(lines: &[String]) -> Node {
    let mut rows: Vec<TableRow> = lines
        .iter()
        .map(|line| {
            TableRow::new(
                split_cells(line)
                    .iter()
                    .map(|cell| TableCell::new(parse_inline(cell)))
                    .collect(),
            )
        })
        .collect();

    // Drop the separator row emitted after the header.
    if rows.len() > 1 {
        let is_separator = rows[1]
            .cells
            .iter()
            .all(|c| TABLE_SEPARATOR_CELL.is_match(c.children.first().map_or("", |n| match n {
                Node::Text { content, .. } => content.as_str(),
                _ => "",
            })));
        if is_separator {
            rows.remove(1);
        }
    }

    Node::Table(rows)
}

/// Split a table line into cell texts, honoring `\|` escapes.
fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for ch in trimmed.chars() {
        if escaped {
            if ch != '|' {
                current.push('\\');
            }
            current.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '|' {
            cells.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    if escaped {
        current.push('\\');
    }
    cells.push(current.trim().to_string());
    cells
}

/// Parse inline Markdown into text spans.
///
/// Scans for the leftmost occurrence of the four token forms; plain runs
/// between matches become unformatted text. A block with no tokens at all
/// becomes a single unformatted text node.
pub fn parse_inline(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut last = 0;

    for caps in INLINE_TOKEN.captures_iter(text) {
        let m = caps.get(0).expect("whole match always present");
        if m.start() > last {
            nodes.push(Node::text(&text[last..m.start()]));
        }
        let (content, format) = if let Some(g) = caps.name("bold") {
            (g.as_str(), FormatMask::BOLD)
        } else if let Some(g) = caps.name("italic") {
            (g.as_str(), FormatMask::ITALIC)
        } else if let Some(g) = caps.name("code") {
            (g.as_str(), FormatMask::CODE)
        } else {
            let g = caps.name("strike").expect("one alternative must match");
            (g.as_str(), FormatMask::STRIKETHROUGH)
        };
        nodes.push(Node::styled(content, format));
        last = m.end();
    }

    if nodes.is_empty() {
        return vec![Node::text(text)];
    }
    if last < text.len() {
        nodes.push(Node::text(&text[last..]));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paragraph() {
        let nodes = from_markdown("Hello World");
        assert_eq!(nodes, vec![Node::paragraph(vec![Node::text("Hello World")])]);
    }

    #[test]
    fn test_blank_line_splits_blocks() {
        let nodes = from_markdown("One\n\nTwo\n\n\n\nThree");
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_heading() {
        let nodes = from_markdown("## Title");
        assert_eq!(
            nodes,
            vec![Node::Heading {
                level: 2,
                children: vec![Node::text("Title")],
            }]
        );
    }

    #[test]
    fn test_heading_level_clamps_to_six() {
        let nodes = from_markdown("######## Deep");
        assert_eq!(
            nodes,
            vec![Node::Heading {
                level: 6,
                children: vec![Node::text("Deep")],
            }]
        );
    }

    #[test]
    fn test_quote() {
        let nodes = from_markdown("> Wise words");
        assert_eq!(nodes, vec![Node::Quote(vec![Node::text("Wise words")])]);
    }

    #[test]
    fn test_bullet_list() {
        let nodes = from_markdown("- One\n- Two\n* Three");
        match &nodes[0] {
            Node::List { kind, items } => {
                assert_eq!(*kind, ListKind::Bullet);
                assert_eq!(items.len(), 3);
                assert_eq!(items[2].children, vec![Node::text("Three")]);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_numbered_list() {
        let nodes = from_markdown("1. First\n2. Second");
        match &nodes[0] {
            Node::List { kind, items } => {
                assert_eq!(*kind, ListKind::Number);
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_check_list() {
        let nodes = from_markdown("- [ ] todo\n- [x] done");
        match &nodes[0] {
            Node::List { kind, items } => {
                assert_eq!(*kind, ListKind::Check);
                assert_eq!(items[0].checked, Some(false));
                assert_eq!(items[1].checked, Some(true));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_mixed_lines_fall_back_to_paragraph() {
        let nodes = from_markdown("- One\nnot a list");
        assert!(matches!(nodes[0], Node::Paragraph(_)));
    }

    #[test]
    fn test_divider() {
        assert_eq!(from_markdown("---"), vec![Node::Divider]);
    }

    #[test]
    fn test_image_block() {
        let nodes = from_markdown("![A cat](cat.png)");
        assert_eq!(
            nodes,
            vec![Node::Image {
                src: "cat.png".to_string(),
                alt: "A cat".to_string(),
            }]
        );
    }

    #[test]
    fn test_fenced_code_block() {
        let nodes = from_markdown("```rust\nlet x = 1;\n\nlet y = 2;\n```");
        assert_eq!(
            nodes,
            vec![Node::CodeBlock {
                code: "let x = 1;\n\nlet y = 2;".to_string(),
                language: "rust".to_string(),
            }]
        );
    }

    #[test]
    fn test_unterminated_fence_swallows_rest() {
        let nodes = from_markdown("```\ncode");
        assert_eq!(
            nodes,
            vec![Node::CodeBlock {
                code: "code".to_string(),
                language: String::new(),
            }]
        );
    }

    #[test]
    fn test_table() {
        let nodes = from_markdown("| A | B |\n| --- | --- |\n| C | D |");
        match &nodes[0] {
            Node::Table(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].cells[0].children, vec![Node::text("A")]);
                assert_eq!(rows[1].cells[1].children, vec![Node::text("D")]);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_table_unescapes_pipes() {
        let nodes = from_markdown("| a\\|b |\n| --- |");
        match &nodes[0] {
            Node::Table(rows) => {
                assert_eq!(rows[0].cells[0].children, vec![Node::text("a|b")]);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_callout() {
        let nodes = from_markdown("> [!💡] First\n> Second");
        match &nodes[0] {
            Node::Callout { emoji, children, .. } => {
                assert_eq!(emoji, "💡");
                assert_eq!(children.len(), 2);
            }
            other => panic!("expected callout, got {:?}", other),
        }
    }

    #[test]
    fn test_inline_single_bits() {
        let nodes = parse_inline("a **b** c *d* e `f` g ~~h~~");
        assert_eq!(
            nodes,
            vec![
                Node::text("a "),
                Node::styled("b", FormatMask::BOLD),
                Node::text(" c "),
                Node::styled("d", FormatMask::ITALIC),
                Node::text(" e "),
                Node::styled("f", FormatMask::CODE),
                Node::text(" g "),
                Node::styled("h", FormatMask::STRIKETHROUGH),
            ]
        );
    }

    #[test]
    fn test_bold_not_misread_as_italic() {
        let nodes = parse_inline("**bold**");
        assert_eq!(nodes, vec![Node::styled("bold", FormatMask::BOLD)]);
    }

    #[test]
    fn test_lone_delimiter_is_plain_text() {
        let nodes = parse_inline("a * b");
        assert_eq!(nodes, vec![Node::text("a * b")]);
    }

    #[test]
    fn test_no_tokens_single_text_node() {
        let nodes = parse_inline("plain text");
        assert_eq!(nodes, vec![Node::text("plain text")]);
    }

    #[test]
    fn test_parse_is_total_on_arbitrary_text() {
        // No structural match anywhere degrades to paragraphs.
        let nodes = from_markdown("| not a table\n#nospace\n>also quote-ish");
        assert_eq!(nodes.len(), 1);
    }
}
