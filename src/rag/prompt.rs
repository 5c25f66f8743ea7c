//! Prompt assembly: fixed instructions + retrieved context + the question.

use crate::config::PromptTemplate;
use crate::vector_store::SearchResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Separator placed between retrieved chunks in the `{context}` slot.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Author of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

/// Ordered messages sent to the chat model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Prompt {
    pub messages: Vec<PromptMessage>,
}

impl Prompt {
    pub fn system(&self) -> Option<&str> {
        self.content_of(Role::System)
    }

    pub fn user(&self) -> Option<&str> {
        self.content_of(Role::User)
    }

    fn content_of(&self, role: Role) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
    }
}

/// Join retrieved chunk texts, in ranking order, for the `{context}` slot.
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.content().trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

impl PromptTemplate {
    /// Fill both templates with the question and the retrieved context.
    ///
    /// The question is interpolated as-is.
    pub fn assemble(&self, question: &str, results: &[SearchResult]) -> Prompt {
        let context = format_context(results);
        let vars = HashMap::from([("question", question), ("context", context.as_str())]);

        Prompt {
            messages: vec![
                PromptMessage {
                    role: Role::System,
                    content: Self::render(&self.system, &vars),
                },
                PromptMessage {
                    role: Role::User,
                    content: Self::render(&self.user, &vars),
                },
            ],
        }
    }
}
