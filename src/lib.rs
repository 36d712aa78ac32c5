use anyhow::Result;

pub mod ai;
pub mod annotate;
pub mod api;
mod config;
pub mod messages;
pub mod version;

pub use annotate::{
    annotate, annotate_response, build_image_link, build_map_link, parse_markdown, scan, split,
    AnnotateConfig, AnnotatedNode, Block, EmphasisPolicy, EntityDecision, GuideDocument,
    LinkContext, LinkStyle, SplitResult, TextSpan, IMAGE_PROMPT_DELIMITER,
};
pub use config::Config;

// ──────────────────────────────────────────────────────────────
// Main application setup
// ──────────────────────────────────────────────────────────────

pub async fn run() -> Result<()> {
    // Config::from_env loads .env if one exists (for local development).
    let config = Config::from_env();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting market guide service...\n{}", version::describe());

    if config.ai.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; /api/guide will answer 503");
    }

    let state = api::ApiState {
        http: reqwest::Client::new(),
        ai: config.ai,
        annotate: config.annotate,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
