use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tailor_api::config::Config;
use tailor_api::llm_client::{self, CompletionService, LlmClient};
use tailor_api::routes::build_router;
use tailor_api::state::AppState;
use tailor_api::tailoring::orchestrator::TailoringPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("tailor_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client; without a key the service still answers previews
    let llm: Option<Arc<dyn CompletionService>> = match config.anthropic_api_key.clone() {
        Some(key) => {
            let client = LlmClient::new(key)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(client))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; tailoring requests will return AI_NOT_CONFIGURED");
            None
        }
    };

    let pipeline = TailoringPipeline::new(llm).with_retry_policy(config.retry_policy());
    info!(
        "Retry budget {}ms, max API retries {}",
        config.retry_budget.as_millis(),
        config.max_api_retries
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
