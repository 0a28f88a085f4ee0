//! Core data structures
//!
//! Note records as the store returns them and prompt definitions as the
//! registry persists them.

use crate::utils::error::AppResult;
use crate::utils::format;
use crate::utils::template::{Bindings, render_template};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token budget used when a prompt does not set one
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// A single note record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub content: String,
    pub timestamp: String,
}

impl Note {
    /// Creation time parsed from the store's timestamp text
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        format::parse_datetime(&self.timestamp)
    }

    /// Case-insensitive substring match against the content
    pub fn matches(&self, query: &str) -> bool {
        self.content
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}

/// A named, reusable instruction template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub system: String,
    pub template: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl PromptDefinition {
    pub fn new(system: &str, template: &str, max_tokens: u32) -> Self {
        Self {
            system: system.to_string(),
            template: template.to_string(),
            max_tokens,
        }
    }

    /// Shape check applied to every persisted entry
    pub fn validate(&self) -> Result<(), String> {
        if self.system.trim().is_empty() {
            return Err("system text is empty".to_string());
        }
        if self.template.trim().is_empty() {
            return Err("template is empty".to_string());
        }
        Ok(())
    }

    /// Bind `bindings` into the template
    pub fn render(&self, bindings: &Bindings) -> AppResult<String> {
        render_template(&self.template, bindings)
    }
}

/// Prompt registry contents keyed by name
pub type PromptMap = BTreeMap<String, PromptDefinition>;

/// The prompts seeded when no registry file exists
pub fn default_prompts() -> PromptMap {
    let mut prompts = PromptMap::new();

    prompts.insert(
        "improve".to_string(),
        PromptDefinition::new(
            "You are an expert editor. Improve the text while keeping its original meaning. Be concise and clear.",
            "Improve this text:\n\n{content}",
            1024,
        ),
    );
    prompts.insert(
        "summarize".to_string(),
        PromptDefinition::new(
            "You are an expert at synthesis. Write concise and accurate summaries.",
            "Summarize this text in at most 3 paragraphs:\n\n{content}",
            512,
        ),
    );
    prompts.insert(
        "translate".to_string(),
        PromptDefinition::new(
            "You are a professional translator. Translate precisely while keeping the context.",
            "Translate this text to {language}:\n\n{content}",
            1024,
        ),
    );
    prompts.insert(
        "ask".to_string(),
        PromptDefinition::new(
            "You are an analytical assistant. Answer using only the provided content.",
            "Based on this text:\n\n{content}\n\nAnswer: {question}",
            512,
        ),
    );
    prompts.insert(
        "proofread".to_string(),
        PromptDefinition::new(
            "You are an expert proofreader. Fix spelling and grammar without changing the style.",
            "Fix spelling and grammar mistakes:\n\n{content}",
            1024,
        ),
    );

    prompts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::template::bind;

    #[test]
    fn test_default_prompts_are_valid() {
        let prompts = default_prompts();
        assert_eq!(prompts.len(), 5);
        for (name, prompt) in &prompts {
            assert!(prompt.validate().is_ok(), "default prompt '{}' invalid", name);
        }
        assert!(prompts.contains_key("translate"));
    }

    #[test]
    fn test_max_tokens_defaults_when_missing() {
        let prompt: PromptDefinition =
            serde_json::from_str(r#"{"system": "s", "template": "t"}"#).unwrap();
        assert_eq!(prompt.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(PromptDefinition::new(" ", "t", 10).validate().is_err());
        assert!(PromptDefinition::new("s", "", 10).validate().is_err());
    }

    #[test]
    fn test_render_translate_prompt() {
        let prompts = default_prompts();
        let rendered = prompts["translate"]
            .render(&bind(&[("language", "French"), ("content", "hola")]))
            .unwrap();
        assert_eq!(rendered, "Translate this text to French:\n\nhola");
    }

    #[test]
    fn test_note_matches_case_insensitive() {
        let note = Note {
            id: 1,
            content: "Buy Milk".to_string(),
            timestamp: "2025-01-17 10:00:00".to_string(),
        };
        assert!(note.matches("milk"));
        assert!(!note.matches("bread"));
        assert!(note.created_at().is_some());
    }
}
