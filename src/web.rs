//! HTTP façade (§6): a thin Axum router around [`crate::engine`].
//!
//! Three routes, all under `/api`: a health check, the mission-analysis
//! endpoint that is the engine's one real caller, and a listing of the
//! simulated-flight fixtures loaded at startup. Everything here
//! deserialises, calls `detect_conflicts` once, and serialises — no
//! part of the deconfliction math lives in this module.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::engine;
use crate::error::EngineError;
use crate::mission::Mission;

#[derive(Clone)]
pub struct AppState {
    pub simulated_flights: Arc<Vec<Mission>>,
    pub grid_cell_size: f64,
}

/// `Json<T>` that maps extraction failures (bad JSON, a missing field,
/// or a `Mission` that fails its own validation during deserialisation)
/// onto the façade's `{"status":"error",...}` 400 envelope instead of
/// axum's default 422 rejection body (§7 `MalformedRequest`).
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: for<'de> Deserialize<'de>,
    S: Send + Sync,
{
    type Rejection = EngineError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(EngineError::MalformedRequest(rejection.body_text())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeMissionRequest {
    mission: Mission,
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "message": "Server is running",
    }))
}

async fn analyze_mission(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeMissionRequest>,
) -> Result<Json<serde_json::Value>, EngineError> {
    let mission = request.mission;
    info!(drone_id = %mission.drone_id, "analyzing mission");

    let conflicts =
        engine::detect_conflicts(&mission, &state.simulated_flights, state.grid_cell_size)?;

    let status = if conflicts.is_empty() { "clear" } else { "conflict" };
    let message = if conflicts.is_empty() {
        "No conflicts detected"
    } else {
        "Conflicts detected"
    };
    info!(drone_id = %mission.drone_id, status, conflict_count = conflicts.len(), "analysis complete");

    Ok(Json(json!({
        "status": status,
        "conflicts": conflicts,
        "message": message,
    })))
}

async fn simulated_flights(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.simulated_flights.as_ref().clone())
}

async fn request_logging_middleware(
    request: Request,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string()[..8].to_string();
    let start = Instant::now();

    info!("Started {} {} [{}]", method, path, request_id);
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    info!(
        "Completed {} {} [{}] {} in {:.2}ms",
        method,
        path,
        request_id,
        response.status().as_u16(),
        elapsed.as_secs_f64() * 1000.0
    );
    response
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze-mission", post(analyze_mission))
        .route("/api/simulated-flights", get(simulated_flights))
        .with_state(state)
        .layer(axum::middleware::from_fn(request_logging_middleware))
        .layer(CorsLayer::permissive())
}

pub async fn start_web_server(config: Config, simulated_flights: Vec<Mission>) -> Result<()> {
    let state = AppState {
        simulated_flights: Arc::new(simulated_flights),
        grid_cell_size: config.grid_cell_size,
    };

    let app = app(state);
    let listener = tokio::net::TcpListener::bind((config.interface, config.port)).await?;
    info!("Web server listening on http://{}:{}", config.interface, config.port);
    axum::serve(listener, app).await?;
    Ok(())
}
