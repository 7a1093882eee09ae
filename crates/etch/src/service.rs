//! Pipeline - the main entry point bundling the three transformations.

use etch_core::{from_markdown, to_markdown, MarkdownOptions, Node};

use crate::rules::{InputRule, InputRules, RuleMatch};
use crate::sanitize::{sanitize_with_options, SanitizeOptions};

/// The document transformation pipeline.
///
/// Bundles sanitization, input-rule matching and the Markdown codec behind
/// one configuration point. A `Pipeline` holds no per-call state, so
/// independent instances (or repeated calls on a shared one) never
/// interfere; the live document is owned by the embedding runtime, never
/// retained here.
pub struct Pipeline {
    sanitize_options: SanitizeOptions,
    markdown_options: MarkdownOptions,
    rules: InputRules,
}

impl Pipeline {
    /// Create a pipeline with default options and the built-in rules.
    pub fn new() -> Self {
        Self {
            sanitize_options: SanitizeOptions::default(),
            markdown_options: MarkdownOptions::default(),
            rules: InputRules::new(),
        }
    }

    /// Create a pipeline with custom options.
    pub fn with_options(sanitize: SanitizeOptions, markdown: MarkdownOptions) -> Self {
        Self {
            sanitize_options: sanitize,
            markdown_options: markdown,
            rules: InputRules::new(),
        }
    }

    /// Register a caller-supplied input rule (tried after the built-ins).
    pub fn add_rule(&mut self, rule: InputRule) -> &mut Self {
        self.rules.add(rule);
        self
    }

    /// Reduce pasted markup to the safe vocabulary.
    pub fn sanitize(&self, raw: &str) -> String {
        sanitize_with_options(raw, &self.sanitize_options)
    }

    /// Evaluate the active node's text against the rule set.
    pub fn try_match(&self, text: &str, composing: bool) -> Option<RuleMatch> {
        self.rules.try_match(text, composing)
    }

    /// Serialize a block sequence to Markdown.
    pub fn to_markdown(&self, nodes: &[Node]) -> String {
        to_markdown(nodes, &self.markdown_options)
    }

    /// Parse Markdown into a block sequence.
    pub fn from_markdown(&self, markdown: &str) -> Vec<Node> {
        from_markdown(markdown)
    }

    /// Get the current sanitizer options
    pub fn sanitize_options(&self) -> &SanitizeOptions {
        &self.sanitize_options
    }

    /// Get the current Markdown options
    pub fn markdown_options(&self) -> &MarkdownOptions {
        &self.markdown_options
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etch_core::FormatMask;

    #[test]
    fn test_paste_flow() {
        let pipeline = Pipeline::new();
        let safe = pipeline.sanitize("<b>X</b><script>alert(1)</script>");
        assert_eq!(safe, "<strong>X</strong>");
    }

    #[test]
    fn test_keystroke_flow() {
        let pipeline = Pipeline::new();
        assert!(pipeline.try_match("> ", false).is_some());
        assert!(pipeline.try_match("hello", false).is_none());
    }

    #[test]
    fn test_markdown_round_trip_single_bits() {
        let pipeline = Pipeline::new();
        let doc = vec![Node::paragraph(vec![
            Node::text("plain "),
            Node::styled("bold", FormatMask::BOLD),
            Node::text(" and "),
            Node::styled("italic", FormatMask::ITALIC),
        ])];
        let markdown = pipeline.to_markdown(&doc);
        assert_eq!(markdown, "plain **bold** and *italic*");
        assert_eq!(pipeline.from_markdown(&markdown), doc);
    }

    #[test]
    fn test_independent_instances() {
        let a = Pipeline::new();
        let b = Pipeline::new();
        assert_eq!(a.sanitize("<p>x</p>"), b.sanitize("<p>x</p>"));
    }

    #[test]
    fn test_custom_rule_registration() {
        use crate::rules::{InputRule, RuleEffect};

        let mut pipeline = Pipeline::new();
        pipeline.add_rule(
            InputRule::new("spoiler", r"^\|\| $", |_| RuleEffect::Replace {
                nodes: vec![Node::Quote(Vec::new())],
                cursor: 0,
            })
            .unwrap(),
        );
        assert!(pipeline.try_match("|| ", false).is_some());
    }
}
