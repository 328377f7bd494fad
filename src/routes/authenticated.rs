use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{post, put},
};

/// Authenticated Router Module
///
/// Defines the routes that mutate game records, all gated by the `AuthUser`
/// extractor middleware layered above this module. Every handler receives the
/// resolved caller identity and runs its own ownership check where one
/// applies (`update_connection`, `delete_connection`).
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /connections
        // Submits a new game. The owner is always the authenticated caller;
        // the payload must carry the complete 4-categories / 16-answers board.
        .route("/connections", post(handlers::create_connection))
        // PUT/DELETE /connections/{id}
        // Modify or remove an owned game. Both handlers look the row up
        // first so not-found and not-owner stay distinct responses.
        .route(
            "/connections/{id}",
            put(handlers::update_connection).delete(handlers::delete_connection),
        )
}
