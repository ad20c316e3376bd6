pub mod settings;

pub use settings::{
    EmbeddingConfig, MemoryConfig, ProviderCredentials, ProvidersConfig, RagConfig, SearchConfig,
    ServerConfig, Settings,
};
