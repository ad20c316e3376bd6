use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use legal_rag_server::app::build_router;
use legal_rag_server::config::Settings;
use legal_rag_server::document::DocumentService;
use legal_rag_server::embedding::HttpEmbeddingClient;
use legal_rag_server::index::DocumentIndex;
use legal_rag_server::memory::SessionStore;
use legal_rag_server::pipeline::AnswerPipeline;
use legal_rag_server::providers::ProviderRouter;
use legal_rag_server::search::TavilyClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,legal_rag_server=debug".to_string()),
        )
        .with_target(true)
        .init();

    info!("Starting Legal RAG Server...");

    let settings = Arc::new(Settings::load()?);
    info!("Configuration loaded");

    let index = Arc::new(DocumentIndex::new());
    let embedder = Arc::new(HttpEmbeddingClient::new(&settings.embedding));
    let search = Arc::new(TavilyClient::new(settings.search.clone()));
    let router = Arc::new(ProviderRouter::new(settings.providers.clone()));
    let sessions = Arc::new(SessionStore::new(settings.memory.max_messages));

    if settings.search.is_configured() {
        info!("Web search enabled");
    } else {
        info!("Web search disabled (no API key)");
    }

    let document_service = Arc::new(DocumentService::new(
        index.clone(),
        embedder.clone(),
        &settings.rag,
    ));

    let pipeline = Arc::new(AnswerPipeline::new(
        index.clone(),
        embedder,
        search,
        router,
        sessions.clone(),
        settings.rag.clone(),
        settings.memory.clone(),
    ));

    let app = build_router(
        settings.clone(),
        index,
        document_service,
        sessions,
        pipeline,
    );

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
