//! Branching conversation graphs.

use serde::{Deserialize, Serialize};

use super::{replace, Substitutions};

/// A branching dialog shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Conversation {
    #[serde(default)]
    pub nodes: Vec<ConversationNode>,
}

/// One step of a conversation: text, then optional choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConversationNode {
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// A player choice. `next: None` ends the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    #[serde(default)]
    pub next: Option<usize>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its index.
    pub fn add_node(&mut self, node: ConversationNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A copy of this conversation with placeholders filled in.
    pub fn substitute(&self, subs: &Substitutions) -> Conversation {
        Conversation {
            nodes: self
                .nodes
                .iter()
                .map(|node| ConversationNode {
                    paragraphs: node.paragraphs.iter().map(|p| replace(p, subs)).collect(),
                    choices: node
                        .choices
                        .iter()
                        .map(|c| Choice {
                            text: replace(&c.text, subs),
                            next: c.next,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl ConversationNode {
    pub fn new(paragraph: impl Into<String>) -> Self {
        Self {
            paragraphs: vec![paragraph.into()],
            choices: Vec::new(),
        }
    }

    pub fn with_choice(mut self, text: impl Into<String>, next: Option<usize>) -> Self {
        self.choices.push(Choice {
            text: text.into(),
            next,
        });
        self
    }
}
