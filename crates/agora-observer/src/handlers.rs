//! REST API endpoint handlers.
//!
//! Each handler is a thin adapter: parse the request, call one [`Agora`]
//! entry point, serialize the result. Validation lives in the core.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Status, uptime, stats |
//! | `GET` | `/api/stats` | Society, agent and event counts |
//! | `GET` | `/api/societies` | All societies with live figures |
//! | `GET` | `/api/societies/{id}` | One society |
//! | `GET` | `/api/societies/{id}/events` | Filtered events |
//! | `POST` | `/api/societies/{id}/decisions` | Submit a decision |
//! | `POST` | `/api/societies/{id}/messages` | Send a private message |
//! | `GET` | `/api/societies/{id}/evolution` | Evolution score |
//! | `GET` | `/api/societies/{id}/digest` | The gazette |
//! | `GET` | `/api/economy` | Balances and prosperity |
//! | `POST` | `/api/agents/register` | Register an agent |
//! | `GET` | `/api/agents/{name}` | Agent profile |
//! | `POST` | `/api/agents/{name}/join/{society}` | Join a society |
//!
//! [`Agora`]: agora_core::Agora

// Axum handlers are async even when the core call they wrap is not.
#![allow(clippy::unused_async)]

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;

use agora_core::{DecisionRequest, MessageRequest, RegisterRequest};
use agora_events::{DEFAULT_LIMIT, EventQuery};
use agora_types::{AgentName, EventKind, SocietyId};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/societies/{id}/events`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct EventsParams {
    /// Maximum number of events (default 50, max 500).
    pub limit: Option<usize>,
    /// Only events of this kind (`decision`, `message`, `join`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Only events this agent takes part in.
    pub agent: Option<String>,
    /// Hide private messages this agent is not party to.
    pub for_agent: Option<String>,
}

impl EventsParams {
    fn to_query(&self) -> Result<EventQuery, ApiError> {
        let mut query = EventQuery::new().limit(self.limit.unwrap_or(DEFAULT_LIMIT));
        if let Some(kind) = non_blank(self.kind.as_deref()) {
            query = query.of_kind(kind.parse::<EventKind>().map_err(ApiError::BadRequest)?);
        }
        if let Some(agent) = non_blank(self.agent.as_deref()) {
            query = query.involving(AgentName::new(agent));
        }
        if let Some(viewer) = non_blank(self.for_agent.as_deref()) {
            query = query.for_agent(AgentName::new(viewer));
        }
        Ok(query)
    }
}

/// Optional body of `POST /api/agents/{name}/join/{society}`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct JoinBody {
    /// Requested role; the next catalog role if absent.
    pub role: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Health and stats
// ---------------------------------------------------------------------------

/// Liveness plus headline counts.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "started_at": state.started_at,
        "uptime_secs": state.uptime_secs(),
        "stats": state.agora.stats(),
    }))
}

/// Society, agent and event counts.
pub async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.agora.stats())
}

// ---------------------------------------------------------------------------
// Societies
// ---------------------------------------------------------------------------

/// Every society with prosperity, member count and event count.
pub async fn list_societies(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let societies = state.agora.societies();
    Json(serde_json::json!({
        "count": societies.len(),
        "societies": societies,
    }))
}

/// One society.
pub async fn get_society(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.agora.society(&SocietyId::new(id))?))
}

/// Filtered events, oldest first.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<EventsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.to_query()?;
    let events = state.agora.query_events(&SocietyId::new(id), &query)?;
    Ok(Json(serde_json::json!({
        "count": events.len(),
        "events": events,
    })))
}

/// Submit a decision; responds with the resolved event.
pub async fn submit_decision(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<DecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.agora.submit_decision(&SocietyId::new(id), &request)?;
    Ok(Json(event))
}

/// Send a private message; responds with the recorded event.
pub async fn submit_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<MessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.agora.submit_message(&SocietyId::new(id), &request)?;
    Ok(Json(event))
}

/// The society's evolution score.
pub async fn get_evolution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.agora.evolution(&SocietyId::new(id))?))
}

/// The society's gazette.
pub async fn get_digest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.agora.digest(&SocietyId::new(id))?))
}

// ---------------------------------------------------------------------------
// Economy and agents
// ---------------------------------------------------------------------------

/// Every balance and every society's prosperity.
pub async fn get_economy(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.agora.economy_snapshot())
}

/// Register an agent.
pub async fn register_agent(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let agent = state.agora.register_agent(&request)?;
    Ok((StatusCode::CREATED, Json(agent)))
}

/// An agent's record and balance.
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.agora.agent_profile(&AgentName::new(name))?))
}

/// Join a society. The body is optional; an empty body requests the next
/// catalog role.
pub async fn join_society(
    State(state): State<Arc<AppState>>,
    Path((name, society)): Path<(String, String)>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let body: JoinBody = if body.iter().all(u8::is_ascii_whitespace) {
        JoinBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("join body: {e}")))?
    };
    let outcome = state.agora.join_society(
        &AgentName::new(name),
        &SocietyId::new(society),
        body.role.as_deref(),
    )?;
    Ok(Json(outcome))
}
