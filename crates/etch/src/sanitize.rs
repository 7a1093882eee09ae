//! Markup sanitization
//!
//! Reduces arbitrary pasted markup to a fixed safe vocabulary. Input is
//! treated as hostile: scripts, styles, frames, event handlers and unknown
//! wrappers are removed or unwrapped, while semantic intent (headings,
//! emphasis, lists, tables) survives. The output is safe markup suitable
//! for the runtime's importer; it is never parsed back here.
//!
//! Processing is bottom-up: children are sanitized into a fresh string
//! first, then the element itself is dropped, rewritten or kept. The parsed
//! source tree is never mutated, so replacements cannot re-trigger
//! processing and deeply nested wrappers collapse in one pass.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node as HtmlNode};

use crate::utilities::{escape_html_attr, escape_html_text, is_void};

/// Tags that survive sanitization as themselves
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "strong", "em", "u", "s", "code",
    "pre", "ul", "ol", "li", "a", "img", "hr", "table", "thead", "tbody", "tr", "th", "td",
];

/// Tags removed together with all their descendants
const STRIP_TAGS: &[&str] = &["script", "style", "iframe", "object", "noscript"];

/// Nesting depth beyond which elements contribute text content only
const MAX_DEPTH: usize = 64;

static FONT_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)font-size\s*:\s*([0-9]*\.?[0-9]+)\s*(px|pt|rem|em)").unwrap());

/// Options for [`sanitize_with_options`].
///
/// The font-size thresholds recover heading intent from markup that encodes
/// structure purely via size (word-processor exports). The cutoffs are
/// product taste, not a structural requirement, so they are configurable.
#[derive(Debug, Clone)]
pub struct SanitizeOptions {
    /// Minimum pixel size mapped to a level-1 heading
    pub h1_min_px: f32,
    /// Minimum pixel size mapped to a level-2 heading
    pub h2_min_px: f32,
    /// Minimum pixel size mapped to a level-3 heading
    pub h3_min_px: f32,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            h1_min_px: 32.0,
            h2_min_px: 24.0,
            h3_min_px: 18.0,
        }
    }
}

/// Reduce arbitrary markup to the safe vocabulary.
///
/// Never fails: malformed fragments are dropped, fully-rejected input
/// yields the empty string.
pub fn sanitize(raw: &str) -> String {
    sanitize_with_options(raw, &SanitizeOptions::default())
}

/// [`sanitize`] with explicit heading-inference thresholds.
pub fn sanitize_with_options(raw: &str, options: &SanitizeOptions) -> String {
    let document = Html::parse_fragment(raw);
    let mut out = String::with_capacity(raw.len());
    sanitize_children(document.root_element(), options, 0, &mut out);
    out
}

/// Sanitize the children of an element into `out`.
///
/// Comments, processing instructions and other non-element, non-text nodes
/// are dropped outright.
fn sanitize_children(element: ElementRef, options: &SanitizeOptions, depth: usize, out: &mut String) {
    for child in element.children() {
        match child.value() {
            HtmlNode::Text(text) => out.push_str(&escape_html_text(&text.text)),
            HtmlNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    sanitize_element(child_element, options, depth + 1, out);
                }
            }
            _ => {}
        }
    }
}

/// Decide one element's fate: strip, rewrite, convert, keep or unwrap.
fn sanitize_element(element: ElementRef, options: &SanitizeOptions, depth: usize, out: &mut String) {
    let tag = element.value().name();

    // Dangerous elements disappear with their entire subtree.
    if STRIP_TAGS.contains(&tag) {
        return;
    }

    // Past the depth cap only the text survives; adversarially nested
    // wrappers cannot grow the stack further.
    if depth > MAX_DEPTH {
        out.push_str(&escape_html_text(&element.text().collect::<String>()));
        return;
    }

    // Children first, so replacements never re-trigger processing.
    let mut inner = String::new();
    sanitize_children(element, options, depth, &mut inner);

    match tag {
        // Legacy and non-semantic tags rewrite to their semantic form.
        "b" => wrap(out, "strong", &inner),
        "i" => wrap(out, "em", &inner),
        "del" | "strike" => wrap(out, "s", &inner),

        // Inline wrappers unwrap unless their font size encodes a heading.
        "span" | "font" => match heading_level_from_style(element.value().attr("style"), options) {
            Some(level) => wrap(out, heading_tag(level), &inner),
            None => out.push_str(&inner),
        },

        // Generic containers become headings or paragraphs.
        "div" => {
            let tag = heading_level_from_style(element.value().attr("style"), options)
                .map(heading_tag)
                .unwrap_or("p");
            wrap(out, tag, &inner);
        }

        t if ALLOWED_TAGS.contains(&t) => emit_allowed(out, element, t, &inner),

        // Anything else unwraps to its already-sanitized children.
        _ => out.push_str(&inner),
    }
}

/// Emit an allowed element, keeping only its allowlisted attributes.
fn emit_allowed(out: &mut String, element: ElementRef, tag: &str, inner: &str) {
    out.push('<');
    out.push_str(tag);
    for name in allowed_attributes(tag) {
        if let Some(value) = element.value().attr(name) {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html_attr(value));
            out.push('"');
        }
    }
    out.push('>');
    if !is_void(tag) {
        out.push_str(inner);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

/// Per-tag attribute allowlist; everything else (style, class, on*) is
/// removed by construction.
fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href"],
        "img" => &["src", "alt"],
        "td" | "th" => &["colspan", "rowspan"],
        _ => &[],
    }
}

fn wrap(out: &mut String, tag: &str, inner: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(inner);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn heading_tag(level: u8) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        _ => "h3",
    }
}

/// Map an inline `font-size` declaration to a heading level.
///
/// Sizes normalize to pixels (pt ×4/3, em and rem ×16) before the
/// threshold comparison; sizes below the smallest threshold infer nothing.
fn heading_level_from_style(style: Option<&str>, options: &SanitizeOptions) -> Option<u8> {
    let caps = FONT_SIZE.captures(style?)?;
    let value: f32 = caps[1].parse().ok()?;
    let px = match caps[2].to_ascii_lowercase().as_str() {
        "pt" => value * 4.0 / 3.0,
        "em" | "rem" => value * 16.0,
        _ => value,
    };
    if px >= options.h1_min_px {
        Some(1)
    } else if px >= options.h2_min_px {
        Some(2)
    } else if px >= options.h3_min_px {
        Some(3)
    } else {
        None
    }
}
