use std::sync::Arc;

use intake_assist::channels::intake_routes;
use intake_assist::config::IntakeConfig;
use intake_assist::intake::generator::{GeneratorConfig, ReplyGenerator};
use intake_assist::llm::{GroqProvider, LlmProvider};
use intake_assist::store::{LeadStore, LibSqlBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = IntakeConfig::from_env().map_err(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export GROQ_API_KEY=gsk_...");
        e
    })?;

    eprintln!("🤖 Intake Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Chat WS: ws://0.0.0.0:{}/ws", config.port);
    eprintln!("   Database: {}", config.db_path);

    // ── Database ─────────────────────────────────────────────────────────
    let store: Arc<dyn LeadStore> = Arc::new(
        LibSqlBackend::new_local(std::path::Path::new(&config.db_path)).await?,
    );

    // ── LLM provider + reply generator ──────────────────────────────────
    let llm: Arc<dyn LlmProvider> =
        Arc::new(GroqProvider::new(config.api_key.clone(), &config.model)?);
    let generator = Arc::new(ReplyGenerator::new(
        llm,
        GeneratorConfig {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        },
    ));

    // ── Server ──────────────────────────────────────────────────────────
    let app = intake_routes(generator, store);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Intake server started");
    axum::serve(listener, app).await?;

    Ok(())
}
