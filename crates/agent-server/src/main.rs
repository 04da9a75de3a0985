//! Resort Concierge HTTP Server
//!
//! Axum-based server for the guest chat and the operations endpoints the
//! staff dashboard polls.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_runtime::build_provider;
use resort_concierge::{AgentCatalog, AgentManager, ManagerConfig, MemoryResortStore, ResortStore};

use crate::config::ServerConfig;
use crate::handlers::{
    chat_handler, health_check, list_orders, list_requests, update_order_status,
    update_request_status,
};
use crate::state::AppState;

/// Build the router with all routes and middleware
fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))
        // Guest chat
        .route("/chat", post(chat_handler))
        // Operations
        .route("/orders", get(list_orders))
        .route("/orders/{id}", put(update_order_status))
        .route("/requests", get(list_requests))
        .route("/requests/{id}", put(update_request_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Initialize LLM provider
    let provider = build_provider(&config.provider)?;
    match provider.health_check().await {
        Ok(true) => tracing::info!(
            backend = %config.provider.backend,
            model = config.provider.model(),
            "✓ Model provider reachable"
        ),
        Ok(false) | Err(_) => {
            tracing::warn!(backend = %config.provider.backend, "⚠ Model provider not available - chat will fail");
        }
    }

    // Resort data and agents
    let store: Arc<dyn ResortStore> = Arc::new(MemoryResortStore::seeded());
    let catalog = AgentCatalog::new(&store);
    let manager = AgentManager::new(
        provider,
        catalog,
        ManagerConfig {
            generation: config.provider.generation_options(),
            router_failure: config.router_failure,
        },
    );
    tracing::info!(policy = ?config.router_failure, "Agent manager ready");

    let app = app(AppState::new(manager, store));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🏨 Resort concierge running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health         - Health check");
    tracing::info!("  POST /chat           - Guest chat turn");
    tracing::info!("  GET  /orders         - Restaurant orders");
    tracing::info!("  PUT  /orders/{{id}}    - Update order status");
    tracing::info!("  GET  /requests       - Room service requests");
    tracing::info!("  PUT  /requests/{{id}}  - Update request status");

    axum::serve(listener, app).await?;

    Ok(())
}
