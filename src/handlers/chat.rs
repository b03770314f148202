//! HTTP handlers for the chat API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{debug, info, Instrument};

use crate::handlers::messages::ConversationRouter;
use crate::middleware::LoggingMiddleware;
use crate::services::ServiceFactory;
use crate::state::{LeadSession, SessionStore, StoreStats};
use crate::utils::errors::AutoStreamError;
use crate::utils::helpers::resolve_session_id;

/// Shared state of the HTTP layer
#[derive(Clone, Debug)]
pub struct AppState {
    router: ConversationRouter,
    store: SessionStore,
    services: Arc<ServiceFactory>,
    logger: LoggingMiddleware,
    default_session_id: String,
}

impl AppState {
    pub fn new(services: ServiceFactory, store: SessionStore, default_session_id: impl Into<String>) -> Self {
        Self {
            router: ConversationRouter::from_services(&services),
            store,
            services: Arc::new(services),
            logger: LoggingMiddleware::default(),
            default_session_id: default_session_id.into(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// Session as it stands after this message
    pub state: LeadSession,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub sessions: StoreStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Chat API routes
pub fn chat_routes(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/sessions/:id", get(get_session))
        .route("/health", get(health))
        .with_state(state)
}

/// Full application: API routes, optional static assets, tracing and CORS
pub fn build_app(state: AppState, static_dir: Option<&str>) -> Router {
    let mut app = chat_routes(state);

    if let Some(dir) = static_dir {
        info!(dir = dir, "Serving static files");
        app = app.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// POST /chat - Route one user message
pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    let session_id = resolve_session_id(req.session_id.as_deref(), &state.default_session_id);
    let tracker = state.logger.start_turn(&session_id, &req.message);

    let (outcome, snapshot) = async {
        let mut session = state.store.lock(&session_id).await;
        let outcome = state.router.route(&mut session, &req.message).await;
        (outcome, session.clone())
    }
    .instrument(tracker.span().clone())
    .await;

    tracker.complete(&snapshot.summary(), outcome.warnings.len());

    let response = ChatResponse {
        response: outcome.reply,
        state: snapshot,
        warnings: outcome.warnings,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /sessions/:id - Current state of a session
pub async fn get_session(State(state): State<AppState>, Path(session_id): Path<String>) -> Response {
    match state.store.snapshot(&session_id).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /health - Service and store status
pub async fn health(State(state): State<AppState>) -> Response {
    let status = state.services.health_check();
    let sessions = state.store.get_stats().await;

    let response = HealthResponse {
        status: if status.is_healthy() { "ok" } else { "degraded" },
        version: crate::VERSION,
        sessions,
        issues: status.get_issues(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

fn error_response(error: AutoStreamError) -> Response {
    let status = match &error {
        AutoStreamError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        AutoStreamError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    debug!(status = %status, error = %error, "Request failed");

    (status, Json(ErrorResponse { error: error.to_string() })).into_response()
}
