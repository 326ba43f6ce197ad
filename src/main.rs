//! Server entry point.

use anyhow::Result;
use blueprint_agent::config::Settings;
use blueprint_agent::prompts::PromptSet;
use blueprint_agent::server::{create_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting blueprint-agent v{}", blueprint_agent::VERSION);

    let settings = Settings::from_env();
    info!(
        model = %settings.model_name,
        explore = %settings.lean_explore_base_url,
        "loaded configuration"
    );

    let prompts = PromptSet::load(&settings.prompts_dir);
    let addr = settings.bind_addr();
    let state = AppState::new(settings, prompts)?;
    let app = create_router(state);

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
