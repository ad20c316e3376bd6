use async_trait::async_trait;
use tracing::info;

use super::adapters::{GeminiProvider, GroqProvider, OpenAiProvider};
use super::{CompletionProvider, ProviderKind};
use crate::config::ProvidersConfig;
use crate::error::ApiError;

/// Result of a routed completion. `llm_used` is the truthful description
/// of what actually executed, e.g. `"Groq (llama-3.3-70b-versatile)"`.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub llm_used: String,
}

/// Dispatch seam between the answer pipeline and the concrete backends.
/// Tests substitute this with a stub that echoes the prompt it received.
#[async_trait]
pub trait CompletionRouter: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        provider: ProviderKind,
        model_override: Option<&str>,
    ) -> Result<Completion, ApiError>;
}

/// Routes a prompt to the requested backend. A provider with no
/// credentials is unavailable; the router never falls back to another
/// backend on the caller's behalf.
pub struct ProviderRouter {
    config: ProvidersConfig,
    openai: OpenAiProvider,
    groq: GroqProvider,
    gemini: GeminiProvider,
}

impl ProviderRouter {
    pub fn new(config: ProvidersConfig) -> Self {
        Self {
            openai: OpenAiProvider::new(&config),
            groq: GroqProvider::new(&config),
            gemini: GeminiProvider::new(&config),
            config,
        }
    }

    pub fn is_configured(&self, provider: ProviderKind) -> bool {
        match provider {
            ProviderKind::Openai => self.config.openai.is_configured(),
            ProviderKind::Groq => self.config.groq.is_configured(),
            ProviderKind::Gemini => self.config.gemini.is_configured(),
        }
    }

    fn default_model(&self, provider: ProviderKind) -> &str {
        match provider {
            ProviderKind::Openai => &self.config.openai.model,
            ProviderKind::Groq => &self.config.groq.model,
            ProviderKind::Gemini => &self.config.gemini.model,
        }
    }

    fn describe(provider: ProviderKind, model: &str) -> String {
        let name = match provider {
            ProviderKind::Openai => "OpenAI",
            ProviderKind::Groq => "Groq",
            ProviderKind::Gemini => "Gemini",
        };
        format!("{} ({})", name, model)
    }
}

#[async_trait]
impl CompletionRouter for ProviderRouter {
    async fn complete(
        &self,
        prompt: &str,
        provider: ProviderKind,
        model_override: Option<&str>,
    ) -> Result<Completion, ApiError> {
        if !self.is_configured(provider) {
            return Err(ApiError::ProviderUnavailable {
                provider: provider.to_string(),
                reason: "API key not configured".to_string(),
            });
        }

        let model = model_override
            .unwrap_or_else(|| self.default_model(provider))
            .to_string();

        info!("Dispatching completion to {} (model: {})", provider, model);

        let text = match provider {
            ProviderKind::Openai => self.openai.complete(prompt, &model).await?,
            ProviderKind::Groq => self.groq.complete(prompt, &model).await?,
            ProviderKind::Gemini => self.gemini.complete(prompt, &model).await?,
        };

        Ok(Completion {
            llm_used: Self::describe(provider, &model),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderCredentials;

    fn config_with_groq_key() -> ProvidersConfig {
        ProvidersConfig {
            openai: ProviderCredentials {
                api_key: "".to_string(),
                model: "gpt-4o-mini".to_string(),
            },
            groq: ProviderCredentials {
                api_key: "key".to_string(),
                model: "llama-3.3-70b-versatile".to_string(),
            },
            gemini: ProviderCredentials {
                api_key: "".to_string(),
                model: "gemini-1.5-flash".to_string(),
            },
            timeout_seconds: 5,
            max_tokens: 100,
            temperature: 0.1,
        }
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_substitution() {
        let router = ProviderRouter::new(config_with_groq_key());
        let err = router
            .complete("prompt", ProviderKind::Openai, None)
            .await
            .unwrap_err();
        match err {
            ApiError::ProviderUnavailable { provider, .. } => assert_eq!(provider, "openai"),
            other => panic!("Expected ProviderUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn configured_flags_reflect_keys() {
        let router = ProviderRouter::new(config_with_groq_key());
        assert!(router.is_configured(ProviderKind::Groq));
        assert!(!router.is_configured(ProviderKind::Openai));
        assert!(!router.is_configured(ProviderKind::Gemini));
    }

    #[test]
    fn description_names_provider_and_model() {
        assert_eq!(
            ProviderRouter::describe(ProviderKind::Groq, "llama-3.3-70b-versatile"),
            "Groq (llama-3.3-70b-versatile)"
        );
    }
}
