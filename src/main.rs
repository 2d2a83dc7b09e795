use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rust_dispatch_api::config::Config;
use rust_dispatch_api::handlers::{self, AppState};
use rust_dispatch_api::scoring;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Scoring model artifacts (ETA and price).
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server. A missing model artifact does not abort
/// startup; the endpoints depending on it degrade per their contract.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_dispatch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Load scoring model artifacts. These are read once and shared immutably
    // across requests for the life of the process.
    let eta_model = scoring::load_model(Path::new(&config.eta_model_path));
    let price_model = scoring::load_model(Path::new(&config.price_model_path));
    if eta_model.is_none() {
        tracing::warn!("ETA model unavailable; ranking and heuristic pricing will degrade");
    }
    if price_model.is_none() {
        tracing::warn!("Price model unavailable; model-surge pricing will degrade");
    }

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
        eta_model,
        price_model,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = handlers::api_router().layer(
        ServiceBuilder::new()
            // Request size limit: 5MB max payload (prevents memory exhaustion)
            .layer(RequestBodyLimitLayer::new(5 * 1024 * 1024))
            // Rate limiting: 10 req/sec per IP, burst of 20 (prevents DDoS)
            .layer(GovernorLayer {
                config: governor_conf,
            }),
    );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
