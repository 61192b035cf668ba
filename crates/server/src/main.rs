//! Server entry point

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use telassist_agent::{DialogueEngine, InMemorySessionStore, SessionOrchestrator};
use telassist_catalog::{ProcedureCatalog, ProcedureMatcher};
use telassist_config::{load_settings, Settings};
use telassist_core::{LlmGateway, SessionStore, SpeechSynthesizer, Transcriber};
use telassist_llm::{LlmConfig, OllamaBackend, OllamaGateway};
use telassist_matcher::LexicalMatcher;
use telassist_server::{create_router, AppState, HttpSynthesizer, HttpTranscriber};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("TELASSIST_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!("Warning: failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing();

    tracing::info!("Starting telassist v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?settings.environment,
        config = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    // No catalog, no service.
    let catalog = match ProcedureCatalog::load(&settings.catalog.path) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            tracing::error!(path = %settings.catalog.path, error = %e, "Failed to load catalog");
            return Err(e.into());
        }
    };
    tracing::info!(procedures = catalog.len(), "Procedure catalog loaded");

    let matcher: Arc<dyn ProcedureMatcher> =
        Arc::new(LexicalMatcher::new(&catalog, settings.matcher.min_score));

    let backend = OllamaBackend::new(LlmConfig::from(&settings.llm))?;
    tracing::info!(
        endpoint = %settings.llm.endpoint,
        model = %settings.llm.model,
        "Generative backend configured"
    );
    let gateway: Arc<dyn LlmGateway> = Arc::new(OllamaGateway::new(backend));

    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let engine = Arc::new(DialogueEngine::new(gateway, sessions));

    let mut orchestrator =
        SessionOrchestrator::new(engine, matcher, settings.matcher.top_k);
    if settings.voice.enabled {
        let transcriber: Arc<dyn Transcriber> =
            Arc::new(HttpTranscriber::new(settings.voice.transcription_endpoint.clone()));
        let synthesizer: Arc<dyn SpeechSynthesizer> = Arc::new(HttpSynthesizer::new(
            settings.voice.synthesis_endpoint.clone(),
            settings.server.static_dir.clone(),
        ));
        orchestrator = orchestrator
            .with_transcriber(transcriber)
            .with_synthesizer(synthesizer, settings.voice.lang.clone());
        tracing::info!(
            transcription = %settings.voice.transcription_endpoint,
            synthesis = %settings.voice.synthesis_endpoint,
            "Voice collaborators enabled"
        );
    } else {
        tracing::info!("Voice disabled, running text-only");
    }

    tokio::fs::create_dir_all(&settings.server.uploads_dir).await?;
    tokio::fs::create_dir_all(
        std::path::Path::new(&settings.server.static_dir).join("generated_audio"),
    )
    .await?;

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let state = AppState::new(Arc::new(settings), catalog, Arc::new(orchestrator));
    let app = create_router(state);

    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
