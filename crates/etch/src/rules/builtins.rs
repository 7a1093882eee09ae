//! Built-in input rules.
//!
//! One builder per rule, collected in priority order by [`builtin_rules`].
//! All patterns are anchored start-to-end so mid-sentence text never
//! triggers a transform.

use etch_core::{ListItem, ListKind, Node};

use super::rule::{InputRule, RuleEffect};

/// Language assigned to code blocks created by the fence rule
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";

/// All built-in rules, in the order they are tried.
pub fn builtin_rules() -> Vec<InputRule> {
    vec![
        heading_rule(1),
        heading_rule(2),
        heading_rule(3),
        quote_rule(),
        bullet_list_rule(),
        numbered_list_rule(),
        check_list_rule(false),
        check_list_rule(true),
        divider_rule(),
        code_block_rule(),
    ]
}

fn builtin<F>(name: &str, pattern: &str, effect: F) -> InputRule
where
    F: Fn(&regex::Captures) -> RuleEffect + Send + Sync + 'static,
{
    InputRule::new(name, pattern, effect).expect("builtin pattern compiles")
}

fn heading_rule(level: u8) -> InputRule {
    let pattern = format!("^{} $", "#".repeat(usize::from(level)));
    builtin(&format!("heading-{level}"), &pattern, move |_| {
        RuleEffect::Replace {
            nodes: vec![Node::Heading {
                level,
                children: Vec::new(),
            }],
            cursor: 0,
        }
    })
}

fn quote_rule() -> InputRule {
    builtin("quote", "^> $", |_| RuleEffect::Replace {
        nodes: vec![Node::Quote(Vec::new())],
        cursor: 0,
    })
}

fn bullet_list_rule() -> InputRule {
    builtin("bullet-list", r"^[-*] $", |_| RuleEffect::Replace {
        nodes: vec![Node::List {
            kind: ListKind::Bullet,
            items: vec![ListItem::new(Vec::new())],
        }],
        cursor: 0,
    })
}

fn numbered_list_rule() -> InputRule {
    builtin("numbered-list", r"^1\. $", |_| RuleEffect::Replace {
        nodes: vec![Node::List {
            kind: ListKind::Number,
            items: vec![ListItem::new(Vec::new())],
        }],
        cursor: 0,
    })
}

fn check_list_rule(checked: bool) -> InputRule {
    let (name, pattern) = if checked {
        ("check-list-checked", r"^\[[xX]\] $")
    } else {
        ("check-list", r"^\[\] $")
    };
    builtin(name, pattern, move |_| RuleEffect::Replace {
        nodes: vec![Node::List {
            kind: ListKind::Check,
            items: vec![ListItem::checked(checked, Vec::new())],
        }],
        cursor: 0,
    })
}

fn divider_rule() -> InputRule {
    builtin("divider", "^---$", |_| RuleEffect::Replace {
        // A divider cannot host a cursor, so an empty paragraph follows it.
        nodes: vec![Node::Divider, Node::Paragraph(Vec::new())],
        cursor: 1,
    })
}

fn code_block_rule() -> InputRule {
    builtin("code-block", "^```$", |_| RuleEffect::Replace {
        nodes: vec![Node::CodeBlock {
            code: String::new(),
            language: DEFAULT_CODE_LANGUAGE.to_string(),
        }],
        cursor: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(text: &str) -> Option<RuleEffect> {
        builtin_rules().iter().find_map(|r| r.try_apply(text))
    }

    #[test]
    fn test_heading_rules() {
        for (text, level) in [("# ", 1), ("## ", 2), ("### ", 3)] {
            match fire(text) {
                Some(RuleEffect::Replace { nodes, cursor }) => {
                    assert_eq!(cursor, 0);
                    assert_eq!(
                        nodes,
                        vec![Node::Heading {
                            level,
                            children: Vec::new(),
                        }]
                    );
                }
                other => panic!("expected heading for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_bullet_markers() {
        for text in ["- ", "* "] {
            match fire(text) {
                Some(RuleEffect::Replace { nodes, .. }) => {
                    assert!(matches!(
                        nodes[0],
                        Node::List {
                            kind: ListKind::Bullet,
                            ..
                        }
                    ));
                }
                other => panic!("expected bullet list for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_check_rules_carry_state() {
        for (text, checked) in [("[] ", false), ("[x] ", true), ("[X] ", true)] {
            match fire(text) {
                Some(RuleEffect::Replace { nodes, .. }) => match &nodes[0] {
                    Node::List { kind, items } => {
                        assert_eq!(*kind, ListKind::Check);
                        assert_eq!(items[0].checked, Some(checked));
                    }
                    other => panic!("expected check list, got {other:?}"),
                },
                other => panic!("expected match for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_divider_adds_trailing_paragraph() {
        match fire("---") {
            Some(RuleEffect::Replace { nodes, cursor }) => {
                assert_eq!(nodes, vec![Node::Divider, Node::Paragraph(Vec::new())]);
                assert_eq!(cursor, 1);
            }
            other => panic!("expected divider, got {other:?}"),
        }
    }

    #[test]
    fn test_code_block_gets_default_language() {
        match fire("```") {
            Some(RuleEffect::Replace { nodes, cursor }) => {
                assert_eq!(cursor, 0);
                match &nodes[0] {
                    Node::CodeBlock { code, language } => {
                        assert_eq!(code, "");
                        assert_eq!(language, DEFAULT_CODE_LANGUAGE);
                    }
                    other => panic!("expected code block, got {other:?}"),
                }
            }
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_numbered_trigger_is_exactly_one() {
        assert!(fire("1. ").is_some());
        assert!(fire("2. ").is_none());
    }
}
