//! Input rule and effect types.

use etch_core::Node;
use regex::{Captures, Regex};

use crate::Result;

/// The outcome a fired rule hands to the document runtime.
///
/// The triggering text is consumed by the replacement: effect closures
/// construct nodes from scratch, so the trigger characters are never
/// inherited by the new block.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEffect {
    /// Replace the active block with `nodes`; the runtime places the
    /// cursor at the end of `nodes[cursor]`.
    Replace { nodes: Vec<Node>, cursor: usize },

    /// Signal the runtime to open its command menu; no tree mutation.
    OpenCommandMenu,
}

/// Type alias for effect builder functions
pub type EffectFn = Box<dyn Fn(&Captures) -> RuleEffect + Send + Sync>;

/// A pattern-triggered transformation of the block being typed into.
pub struct InputRule {
    name: String,
    pattern: Regex,
    effect: EffectFn,
}

impl InputRule {
    /// Create a rule from a pattern and an effect builder.
    ///
    /// Fails if the pattern does not compile. Patterns should be anchored
    /// `^…$`; the engine additionally requires the match to span the
    /// node's entire text, so mid-sentence occurrences never fire.
    pub fn new<F>(name: &str, pattern: &str, effect: F) -> Result<Self>
    where
        F: Fn(&Captures) -> RuleEffect + Send + Sync + 'static,
    {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(pattern)?,
            effect: Box::new(effect),
        })
    }

    /// The rule's registration name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run this rule against the node's full text.
    pub(crate) fn try_apply(&self, text: &str) -> Option<RuleEffect> {
        let caps = self.pattern.captures(text)?;
        let whole = caps.get(0).expect("group 0 always present");
        if whole.start() != 0 || whole.end() != text.len() {
            return None;
        }
        Some((self.effect)(&caps))
    }
}

impl std::fmt::Debug for InputRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}
