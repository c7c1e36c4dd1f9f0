//! Weekly event endpoints
//!
//! Every handler is scoped to the authenticated user. The owner always comes
//! from the access token; an `owner` in the payload is ignored.

mod handlers;
mod types;

use axum::{routing::get, Router};

use super::state::AppState;

pub use types::{EventRequest, EventResponse, PatchEventRequest};

/// Create the events router
pub fn create_events_router() -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route(
            "/events/{event_id}",
            get(handlers::get_event)
                .put(handlers::update_event)
                .patch(handlers::partial_update_event)
                .delete(handlers::delete_event),
        )
}
