//! Input-rule engine
//!
//! Watches the text content of the block currently receiving keystrokes and
//! decides when a prefix pattern should replace itself with a structural
//! node. Rules are tried in a fixed priority order (built-ins first, caller
//! rules appended); the first match wins and there is no further ambiguity
//! resolution.
//!
//! Matching is suppressed while an IME composition is in progress, since
//! composition text is provisional. The lone `/` on an otherwise-empty
//! block is reserved: it signals the command menu instead of matching
//! ordinary rules.

mod builtins;
mod rule;

pub use builtins::{builtin_rules, DEFAULT_CODE_LANGUAGE};
pub use rule::{EffectFn, InputRule, RuleEffect};

use indexmap::IndexMap;

/// The reserved command-menu trigger
const COMMAND_MENU_TRIGGER: &str = "/";

/// A fired rule: which rule matched and what the runtime should apply.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    /// Name of the rule that fired
    pub rule: String,
    /// Mutation description for the runtime
    pub effect: RuleEffect,
}

/// Ordered rule collection
pub struct InputRules {
    builtins: Vec<InputRule>,
    custom: IndexMap<String, InputRule>,
}

impl InputRules {
    /// Create the engine with the built-in rules.
    pub fn new() -> Self {
        Self {
            builtins: builtin_rules(),
            custom: IndexMap::new(),
        }
    }

    /// Register a caller rule.
    ///
    /// Caller rules are tried after the built-ins, in registration order;
    /// re-registering a name replaces the earlier rule in place.
    pub fn add(&mut self, rule: InputRule) {
        self.custom.insert(rule.name().to_string(), rule);
    }

    /// Decide whether the current text should trigger a transformation.
    ///
    /// Invoked once per text-content change of the active node. `composing`
    /// is the runtime's IME state; while it is set nothing matches, and the
    /// same text can still match on the next content change after
    /// composition ends. "No rule matched" is the normal outcome for most
    /// keystrokes, not an error.
    pub fn try_match(&self, text: &str, composing: bool) -> Option<RuleMatch> {
        if composing {
            return None;
        }

        if text == COMMAND_MENU_TRIGGER {
            return Some(RuleMatch {
                rule: "command-menu".to_string(),
                effect: RuleEffect::OpenCommandMenu,
            });
        }

        for rule in self.builtins.iter().chain(self.custom.values()) {
            if let Some(effect) = rule.try_apply(text) {
                return Some(RuleMatch {
                    rule: rule.name().to_string(),
                    effect,
                });
            }
        }

        None
    }
}

impl Default for InputRules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etch_core::Node;

    #[test]
    fn test_anchored_matching() {
        let rules = InputRules::new();
        assert!(rules.try_match("# ", false).is_some());
        // A non-empty prefix must not fire the rule.
        assert!(rules.try_match("x# ", false).is_none());
        assert!(rules.try_match("# x", false).is_none());
    }

    #[test]
    fn test_no_match_is_normal() {
        let rules = InputRules::new();
        assert!(rules.try_match("just typing", false).is_none());
        assert!(rules.try_match("", false).is_none());
    }

    #[test]
    fn test_composition_suppresses_matching() {
        let rules = InputRules::new();
        assert!(rules.try_match("# ", true).is_none());
        // After composition ends the same text can still fire.
        assert!(rules.try_match("# ", false).is_some());
    }

    #[test]
    fn test_slash_opens_command_menu() {
        let rules = InputRules::new();
        let matched = rules.try_match("/", false).unwrap();
        assert_eq!(matched.effect, RuleEffect::OpenCommandMenu);
        // Slash mid-text is not the trigger.
        assert!(rules.try_match("a/", false).is_none());
    }

    #[test]
    fn test_fired_rule_consumes_text() {
        let rules = InputRules::new();
        let matched = rules.try_match("## ", false).unwrap();
        match matched.effect {
            RuleEffect::Replace { nodes, .. } => {
                // The replacement never inherits the trigger characters,
                // and the emptied text cannot re-fire.
                assert!(nodes[0].text_content().is_empty());
                assert!(rules.try_match("", false).is_none());
            }
            other => panic!("expected replace, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_rules_run_after_builtins() {
        let mut rules = InputRules::new();
        rules.add(
            InputRule::new("late-heading", "^# $", |_| RuleEffect::OpenCommandMenu).unwrap(),
        );
        // The built-in heading rule still wins.
        let matched = rules.try_match("# ", false).unwrap();
        assert_eq!(matched.rule, "heading-1");

        rules.add(
            InputRule::new("toggle", "^!! $", |_| RuleEffect::Replace {
                nodes: vec![Node::paragraph(vec![])],
                cursor: 0,
            })
            .unwrap(),
        );
        let matched = rules.try_match("!! ", false).unwrap();
        assert_eq!(matched.rule, "toggle");
    }

    #[test]
    fn test_registration_order_is_stable() {
        let mut rules = InputRules::new();
        rules.add(InputRule::new("first", "^@@$", |_| RuleEffect::OpenCommandMenu).unwrap());
        rules.add(InputRule::new("second", "^@@$", |_| RuleEffect::OpenCommandMenu).unwrap());
        let matched = rules.try_match("@@", false).unwrap();
        assert_eq!(matched.rule, "first");
    }
}
