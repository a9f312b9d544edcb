//! HTTP surface: `/create`, `/update` and `/poll`.

use crate::config::ServerConfig;
use crate::games::ayu::Move;
use crate::registry::{CreatedGame, SessionRegistry};
use crate::session::{PollOutcome, SessionError};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Shared state of the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    registry: Arc<SessionRegistry>,
    poll_delay: Duration,
}

impl AppState {
    /// Creates handler state.
    pub fn new(registry: Arc<SessionRegistry>, poll_delay: Duration) -> Self {
        Self {
            registry,
            poll_delay,
        }
    }
}

/// Body of `POST /create`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Board size; 11 when omitted.
    #[serde(default)]
    pub size: Option<usize>,
}

/// Body of `POST /update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Game id.
    pub game: String,
    /// Version the move was computed against.
    pub version: usize,
    /// Key of the player to move.
    pub key: String,
    /// The move.
    #[serde(rename = "move")]
    pub mv: Move,
}

/// Query of `GET /poll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollQuery {
    /// Game id.
    pub game: String,
    /// Version to wait for.
    #[serde(default)]
    pub version: usize,
}

/// Error reply of the HTTP handlers.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ApiError {
    /// The request body is not valid JSON for the endpoint.
    #[display("Bad request: {}", _0)]
    BadRequest(String),
    /// The session layer rejected the request.
    #[display("{}", _0)]
    Session(SessionError),
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Session(err) => match err {
                SessionError::NotFound(_) => StatusCode::NOT_FOUND,
                SessionError::Conflict { .. } => StatusCode::CONFLICT,
                SessionError::Forbidden => StatusCode::FORBIDDEN,
                SessionError::IllegalMove(_) => StatusCode::UNPROCESSABLE_ENTITY,
                SessionError::InvalidGame(_) => StatusCode::BAD_REQUEST,
                SessionError::IdCollision(_)
                | SessionError::Storage(_)
                | SessionError::Corrupt { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = %status, error = %self, "Request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

/// Builds the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/create", post(create_game))
        .route("/update", post(update_game))
        .route("/poll", get(poll_game))
        .with_state(state)
}

#[instrument(skip_all)]
async fn create_game(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CreatedGame>, ApiError> {
    let request: CreateRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };
    info!(size = ?request.size, "POST /create");
    Ok(Json(state.registry.create(request.size)?))
}

#[instrument(skip_all)]
async fn update_game(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request: UpdateRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    info!(game_id = %request.game, version = request.version, "POST /update");
    state
        .registry
        .update(&request.game, request.version, &request.key, request.mv)
        .await?;
    Ok(StatusCode::OK)
}

#[instrument(skip_all)]
async fn poll_game(
    State(state): State<AppState>,
    Query(query): Query<PollQuery>,
) -> Result<Response, ApiError> {
    info!(game_id = %query.game, version = query.version, "GET /poll");
    let outcome = state
        .registry
        .poll(&query.game, query.version, state.poll_delay)
        .await?;
    let no_cache = [(header::CACHE_CONTROL, "no-cache")];
    Ok(match outcome {
        PollOutcome::Ready(view) => (no_cache, Json(view)).into_response(),
        PollOutcome::NoUpdate => (StatusCode::NO_CONTENT, no_cache).into_response(),
    })
}

/// Serves the HTTP API until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
#[instrument(skip_all, fields(addr = %config.bind_address()))]
pub async fn serve(config: &ServerConfig, registry: Arc<SessionRegistry>) -> anyhow::Result<()> {
    let app = router(AppState::new(registry, config.poll_delay()));
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(addr = %listener.local_addr()?, "Binding to address");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
