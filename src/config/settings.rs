use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub embedding: EmbeddingConfig,
    pub providers: ProvidersConfig,
    pub search: SearchConfig,
    pub rag: RagConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub dimension: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub openai: ProviderCredentials,
    pub groq: ProviderCredentials,
    pub gemini: ProviderCredentials,
    pub timeout_seconds: u64,
    pub max_tokens: usize,
    pub temperature: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderCredentials {
    pub api_key: String,
    pub model: String,
}

impl ProviderCredentials {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub base_url: String,
    /// Prepended to every web query to keep results on topic.
    pub topic_prefix: String,
    pub timeout_seconds: u64,
}

impl SearchConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RagConfig {
    pub retrieval_top_k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MemoryConfig {
    /// Hard bound on messages kept per session (FIFO eviction beyond this).
    pub max_messages: usize,
    /// How many trailing messages are serialized into the prompt.
    pub context_messages: usize,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000_i64)?
            .set_default("server.max_upload_bytes", 25 * 1024 * 1024_i64)?
            .set_default("embedding.base_url", "http://127.0.0.1:8080")?
            .set_default("embedding.dimension", 384_i64)?
            .set_default("embedding.timeout_seconds", 60_i64)?
            .set_default("providers.openai.api_key", "")?
            .set_default("providers.openai.model", "gpt-4o-mini")?
            .set_default("providers.groq.api_key", "")?
            .set_default("providers.groq.model", "llama-3.3-70b-versatile")?
            .set_default("providers.gemini.api_key", "")?
            .set_default("providers.gemini.model", "gemini-1.5-flash")?
            .set_default("providers.timeout_seconds", 90_i64)?
            .set_default("providers.max_tokens", 1500_i64)?
            .set_default("providers.temperature", 0.1_f64)?
            .set_default("search.api_key", "")?
            .set_default("search.base_url", "https://api.tavily.com")?
            .set_default("search.topic_prefix", "company law")?
            .set_default("search.timeout_seconds", 20_i64)?
            .set_default("rag.retrieval_top_k", 5_i64)?
            .set_default("rag.chunk_size", 1000_i64)?
            .set_default("rag.chunk_overlap", 200_i64)?
            .set_default("memory.max_messages", 20_i64)?
            .set_default("memory.context_messages", 6_i64)?
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }
}
