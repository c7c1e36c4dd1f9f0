use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use super::types::{EventRequest, EventResponse, PatchEventRequest};
use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, JsonRejection};
use crate::domain::event::EventId;

fn ignore_owner(owner: Option<&serde_json::Value>) {
    if owner.is_some() {
        debug!("Ignoring read-only 'owner' in event payload");
    }
}

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = state.event_service.list(user.id()).await?;

    Ok(Json(events.iter().map(EventResponse::from).collect()))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<EventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    debug!(user_id = %user.id(), title = %request.title, "Creating event");
    ignore_owner(request.owner.as_ref());

    let event = state
        .event_service
        .create(user.id(), request.into())
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(&event))))
}

/// GET /api/events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>, ApiError> {
    let id = EventId::parse(&event_id)?;
    let event = state.event_service.get(user.id(), &id).await?;

    Ok(Json(EventResponse::from(&event)))
}

/// PUT /api/events/{event_id}
pub async fn update_event(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(event_id): Path<String>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<Json<EventResponse>, ApiError> {
    let id = EventId::parse(&event_id)?;
    // Missing or foreign events are reported before body errors
    state.event_service.get(user.id(), &id).await?;
    let Json(request) = body?;
    debug!(event_id = %id, user_id = %user.id(), "Replacing event");
    ignore_owner(request.owner.as_ref());

    let event = state
        .event_service
        .update(user.id(), &id, request.into())
        .await?;

    Ok(Json(EventResponse::from(&event)))
}

/// PATCH /api/events/{event_id}
pub async fn partial_update_event(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(event_id): Path<String>,
    body: Result<Json<PatchEventRequest>, JsonRejection>,
) -> Result<Json<EventResponse>, ApiError> {
    let id = EventId::parse(&event_id)?;
    state.event_service.get(user.id(), &id).await?;
    let Json(request) = body?;
    debug!(event_id = %id, user_id = %user.id(), "Patching event");
    ignore_owner(request.owner.as_ref());

    let event = state
        .event_service
        .partial_update(user.id(), &id, request.into())
        .await?;

    Ok(Json(EventResponse::from(&event)))
}

/// DELETE /api/events/{event_id}
pub async fn delete_event(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(event_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = EventId::parse(&event_id)?;
    state.event_service.delete(user.id(), &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
