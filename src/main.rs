//! SeniorMatch HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use seniormatch::cache::Caches;
use seniormatch::config::{Config, SettingsStore};
use seniormatch::constants::DEFAULT_EMBEDDING_DIM;
use seniormatch::embedding::{EmbeddingAggregator, EmbeddingProvider, HashingEmbedder, OpenAiEmbedder};
use seniormatch::gateway::{HandlerState, create_router_with_state};
use seniormatch::ingest::{IngestPipeline, SyncCheckpoint};
use seniormatch::matching::MatchService;
use seniormatch::search::InMemorySearchBackend;
use seniormatch::seniority::SeniorityClassifier;
use seniormatch::titles::{
    OpenAiTitleMapper, TitleMapper, TitleStandardizer, TitleVocabulary, VocabularyMatcher,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let caches = Caches::open(&config.storage_path, config.memory_cache_capacity);

    if std::env::args().any(|arg| arg == "--reset-caches") {
        let removed = caches.reset()?;
        tracing::info!(removed, "Caches reset");
        return Ok(());
    }

    let addr: SocketAddr = config.socket_addr().parse()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        storage = %config.storage_path.display(),
        "SeniorMatch starting"
    );

    let (embedder, mapper): (Arc<dyn EmbeddingProvider>, Arc<dyn TitleMapper>) =
        match &config.openai_api_key {
            Some(key) => (
                Arc::new(OpenAiEmbedder::new(
                    key.as_str(),
                    &config.openai_base_url,
                    config.embedding_model.clone(),
                    DEFAULT_EMBEDDING_DIM,
                    config.request_timeout(),
                )?),
                Arc::new(OpenAiTitleMapper::new(
                    key.as_str(),
                    &config.openai_base_url,
                    config.title_model.clone(),
                    config.request_timeout(),
                )?),
            ),
            None => {
                tracing::warn!("No API key configured, running embedder and title mapper in stub mode");
                (
                    Arc::new(HashingEmbedder::new(DEFAULT_EMBEDDING_DIM)),
                    Arc::new(VocabularyMatcher),
                )
            }
        };

    let vocabulary = match &config.vocabulary_path {
        Some(path) => TitleVocabulary::load(path)?,
        None => {
            tracing::warn!("No title vocabulary configured, every title resolves to NONE");
            TitleVocabulary::parse("")
        }
    };
    tracing::info!(titles = vocabulary.len(), "Title vocabulary loaded");

    let aggregator = Arc::new(EmbeddingAggregator::new(embedder, Arc::clone(&caches.embeddings)));
    let titles = Arc::new(TitleStandardizer::new(
        mapper,
        Arc::clone(&caches.titles),
        Arc::new(vocabulary),
    ));
    let backend = Arc::new(InMemorySearchBackend::new(DEFAULT_EMBEDDING_DIM));

    let pipeline = Arc::new(
        IngestPipeline::new(
            config.current_year,
            Arc::new(SeniorityClassifier::new()),
            titles,
            Arc::clone(&aggregator),
            Arc::clone(&backend),
        )
        .with_window(config.ingest_window),
    );
    let matcher = MatchService::new(
        aggregator,
        backend,
        SettingsStore::new(config.settings_path.clone()),
    );

    let state = HandlerState::new(matcher, pipeline, SyncCheckpoint::new(config.checkpoint_path()))
        .with_sources(config.source_path.clone(), config.job_source_path.clone());
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("SeniorMatch shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("SENIORMATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/api/health", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
