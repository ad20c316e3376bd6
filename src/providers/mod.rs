pub mod adapters;
pub mod router;

pub use adapters::{ChatCompletionsClient, GeminiProvider, GroqProvider, OpenAiProvider};
pub use router::{Completion, CompletionRouter, ProviderRouter};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// The supported LLM backends. Selection is caller-visible: the router
/// never substitutes a different provider than the one requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Openai,
    #[default]
    Groq,
    Gemini,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderKind::Openai => "openai",
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
        };
        write!(f, "{}", name)
    }
}

/// One capability: accept a prompt, return a completion. Each adapter
/// does its own request/response translation for its backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_deserializes_lowercase() {
        let kind: ProviderKind = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(kind, ProviderKind::Gemini);
    }

    #[test]
    fn default_provider_is_groq() {
        assert_eq!(ProviderKind::default(), ProviderKind::Groq);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(serde_json::from_str::<ProviderKind>("\"claude\"").is_err());
    }
}
