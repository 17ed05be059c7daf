//! Main Nuskha binary.
//!
//! Loads `.env`, initialises tracing, resolves the core configuration from the environment
//! and serves the REST API.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{core_config_from_env, router, AppState, DEFAULT_REST_ADDR};

/// Main entry point for the Nuskha application
///
/// # Environment Variables
/// - `NUSKHA_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `NUSKHA_DATABASE_PATH`: SQLite database file (default: "nuskha.db")
/// - `NUSKHA_AI_API_URL` and friends: optional remote suggestions
/// - `NUSKHA_PDF_FONT`: TrueType font for Dari text in PDFs
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, start-up or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nuskha=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("NUSKHA_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = core_config_from_env()?;
    tracing::info!(
        "++ Database {} (remote AI {})",
        cfg.database_path().display(),
        if cfg.ai().is_some() { "enabled" } else { "disabled" }
    );
    let state = AppState::from_config(&cfg)?;

    tracing::info!("++ Starting Nuskha REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
