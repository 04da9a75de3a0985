//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use agent_core::{AgentError, ConversationTurn};
use resort_concierge::{
    ConciergeError, Order, OrderStatus, RequestStatus, ServiceRequest,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub provider_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn store_error(err: &ConciergeError) -> ApiError {
    if err.is_not_found() {
        api_error(StatusCode::NOT_FOUND, err.to_string(), "NOT_FOUND")
    } else {
        tracing::error!("Store error: {}", err);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), "STORE_ERROR")
    }
}

/// A failed chat turn; transport faults log at error, anything else at warn
fn agent_error(err: &AgentError) -> ApiError {
    if err.is_transport() {
        tracing::error!(retryable = err.is_retryable(), "Agent error: {}", err);
    } else {
        tracing::warn!("Agent error: {}", err);
    }
    api_error(StatusCode::INTERNAL_SERVER_ERROR, err.user_message(), "AGENT_ERROR")
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.manager.provider();
    let provider_connected = provider.health_check().await.unwrap_or(false);
    let (name, model) = provider
        .info()
        .await
        .map(|info| (info.name, info.model))
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: name,
        model,
        provider_connected,
    })
}

/// Resolve one guest turn
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let response = state
        .manager
        .chat(&payload.history)
        .await
        .map_err(|e| agent_error(&e))?;

    Ok(Json(ChatResponse { response }))
}

/// All restaurant orders
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    state.store.orders().await.map(Json).map_err(|e| store_error(&e))
}

/// All room-service requests
pub async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    state
        .store
        .service_requests()
        .await
        .map(Json)
        .map_err(|e| store_error(&e))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(update): Json<StatusUpdate<OrderStatus>>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .store
        .update_order_status(id, update.status)
        .await
        .map_err(|e| store_error(&e))?;

    tracing::info!(order = id, status = %order.status, "Order status updated");
    Ok(Json(order))
}

pub async fn update_request_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(update): Json<StatusUpdate<RequestStatus>>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let request = state
        .store
        .update_request_status(id, update.status)
        .await
        .map_err(|e| store_error(&e))?;

    tracing::info!(request = id, status = %request.status, "Service request status updated");
    Ok(Json(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use agent_core::ModelReply;
    use agent_core::testing::ScriptedProvider;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use resort_concierge::{AgentCatalog, AgentManager, ManagerConfig, MemoryResortStore, ResortStore};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn state_with(provider: ScriptedProvider) -> AppState {
        let store: Arc<dyn ResortStore> = Arc::new(MemoryResortStore::seeded());
        let manager = AgentManager::new(
            Arc::new(provider),
            AgentCatalog::new(&store),
            ManagerConfig::default(),
        );
        AppState::new(manager, store)
    }

    async fn send(state: AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = crate::app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_chat_places_order() {
        let provider = ScriptedProvider::new()
            .with_classification("Restaurant")
            .with_reply(ModelReply::function_call(
                "place_restaurant_order",
                json!({ "room_number": "204", "items": "2x Masala Dosa" }),
            ))
            .with_reply(ModelReply::text("Your order #1 is on its way. Total ₹240."));
        let state = state_with(provider);

        let (status, body) = send(
            state.clone(),
            "POST",
            "/chat",
            Some(json!({ "history": [
                { "role": "assistant", "content": "Welcome!" },
                { "role": "user", "content": "Two masala dosas to room 204" }
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Your order #1 is on its way. Total ₹240.");

        let (status, orders) = send(state, "GET", "/orders", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(orders[0]["room_number"], "204");
        assert_eq!(orders[0]["status"], "Pending");
        assert_eq!(orders[0]["total_amount"], "240");
    }

    #[tokio::test]
    async fn test_chat_transport_failure_is_500() {
        let provider = ScriptedProvider::new()
            .with_classification_error(AgentError::ProviderUnavailable("connection refused".into()));

        let (status, body) = send(
            state_with(provider),
            "POST",
            "/chat",
            Some(json!({ "history": [{ "role": "user", "content": "Hello" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "AGENT_ERROR");
        assert_eq!(
            body["error"],
            "The concierge service is currently unavailable. Please try again."
        );
    }

    #[test]
    fn test_agent_error_hides_details() {
        let (status, Json(body)) = agent_error(&AgentError::RateLimited("quota 429 for key abc".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "AGENT_ERROR");
        assert_eq!(body.error, "We're receiving a lot of requests. Please wait a moment.");

        let (_, Json(body)) = agent_error(&AgentError::Config("Provider is required".into()));
        assert_eq!(body.error, "An unexpected error occurred.");
    }

    #[tokio::test]
    async fn test_blank_message_asks_how_to_help() {
        let (status, body) = send(
            state_with(ScriptedProvider::new()),
            "POST",
            "/chat",
            Some(json!({ "history": [{ "role": "user", "content": "   " }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "How can I help you?");
    }

    #[tokio::test]
    async fn test_empty_history_asks_how_to_help() {
        let (status, body) = send(
            state_with(ScriptedProvider::new()),
            "POST",
            "/chat",
            Some(json!({ "history": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "How can I help you?");
    }

    #[tokio::test]
    async fn test_request_status_update() {
        let state = state_with(ScriptedProvider::new());
        state
            .store
            .create_service_request("305", "cleaning", None)
            .await
            .unwrap();

        let (status, body) = send(
            state.clone(),
            "PUT",
            "/requests/1",
            Some(json!({ "status": "In Progress" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "In Progress");

        let (_, requests) = send(state, "GET", "/requests", None).await;
        assert_eq!(requests[0]["status"], "In Progress");
    }

    #[tokio::test]
    async fn test_missing_order_is_404() {
        let (status, body) = send(
            state_with(ScriptedProvider::new()),
            "PUT",
            "/orders/42",
            Some(json!({ "status": "Delivered" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["error"], "Order 42 not found");
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let (status, _) = send(
            state_with(ScriptedProvider::new()),
            "PUT",
            "/orders/1",
            Some(json!({ "status": "Teleported" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_health_reports_provider() {
        let (status, body) = send(state_with(ScriptedProvider::new()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["provider"], "Scripted");
        assert_eq!(body["provider_connected"], true);
    }
}
