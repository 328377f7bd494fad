use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any
/// client. Reads never mutate, so every handler here is safe to expose
/// anonymously; the only data withheld from listings is the board content,
/// which the index projection strips at the model layer.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load
        // balancer checks. Returns "ok" immediately.
        .route("/health", get(|| async { "ok" }))
        // GET /connections
        // Lists all games in the index projection, newest id first.
        .route("/connections", get(handlers::get_connections))
        // GET /connections/{id}
        // Full projection of a single game; genuine 404 when absent.
        .route("/connections/{id}", get(handlers::get_connection_details))
        // GET /connections/users/{user_id}
        // A user's games, newest id first. Unknown user is a 404; a known
        // user with no games gets an empty list.
        .route(
            "/connections/users/{user_id}",
            get(handlers::get_user_connections),
        )
}
