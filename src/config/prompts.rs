//! Prompt templates for faqbot.
//!
//! The defaults can be overridden by placing a `prompts.toml` file in the
//! custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub support: PromptTemplate,
}

/// A pair of message templates with `{name}` slots.
///
/// The support templates use the `question` and `context` slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplate {
    pub system: String,
    pub user: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system: r#"You are a customer support specialist
question: {question}.
You assist users with general inquiries based on {context}
and technical issues."#
                .to_string(),

            user: "{question}".to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Render a template, replacing every `{name}` whose name is in `vars`.
    ///
    /// Substitution is a single left-to-right pass, so slot syntax inside a
    /// substituted value is emitted verbatim. Unknown slots are left as-is.
    pub fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            match after.find('}') {
                Some(close) if is_slot_name(&after[..close]) => {
                    let name = &after[..close];
                    match vars.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

fn is_slot_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Prompts {
    /// Load prompts, applying overrides from `custom_dir/prompts.toml` if present.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let prompts_path = custom_path.join("prompts.toml");
            if prompts_path.exists() {
                let content = std::fs::read_to_string(&prompts_path)?;
                prompts = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }
}
