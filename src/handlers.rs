use crate::{
    AppState,
    auth::AuthUser,
    models::{
        Connection, ConnectionListResponse, CreateConnectionRequest, MessageResponse,
        OwnershipErrorResponse, UpdateConnectionRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

// Wire messages shared with the frontend.
const GAME_NOT_FOUND: &str = "Connections game not found";
const USER_GAMES_NOT_FOUND: &str = "User tracks not found";
const DELETE_SUCCESS: &str = "Successfully deleted!";
const NOT_OWNER: &str = "You are not the owner of this Connections game";

// --- Response Helpers ---

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(MessageResponse::new(message))).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(MessageResponse::new(message))).into_response()
}

fn ownership_error(current_user: i64, connection_author: i64) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(OwnershipErrorResponse {
            error: NOT_OWNER.to_string(),
            current_user,
            connection_author,
        }),
    )
        .into_response()
}

// --- Handlers ---

/// get_connections
///
/// [Public Route] Lists every stored game in its index projection, newest id
/// first. An empty table yields an empty list, never an error.
#[utoipa::path(
    get,
    path = "/connections",
    responses((status = 200, description = "All games, newest first", body = ConnectionListResponse))
)]
pub async fn get_connections(State(state): State<AppState>) -> Json<ConnectionListResponse> {
    let connections = state.repo.get_connections().await;
    Json(ConnectionListResponse { connections })
}

/// get_connection_details
///
/// [Public Route] Retrieves the full projection of a single game by id.
/// A missing id maps to a real 404 with the frontend's message body.
#[utoipa::path(
    get,
    path = "/connections/{id}",
    params(("id" = i64, Path, description = "Connection ID")),
    responses(
        (status = 200, description = "Found", body = Connection),
        (status = 404, description = "No such game", body = MessageResponse)
    )
)]
pub async fn get_connection_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    match state.repo.get_connection(id).await {
        Some(connection) => Json(connection).into_response(),
        None => not_found(GAME_NOT_FOUND),
    }
}

/// get_user_connections
///
/// [Public Route] Lists a user's games in the index projection, newest id first.
///
/// Unknown user and empty shelf are distinct outcomes here: an id with no
/// matching `users` row is a 404, while a real user with zero games gets a
/// 200 with an empty list.
#[utoipa::path(
    get,
    path = "/connections/users/{user_id}",
    params(("user_id" = i64, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "The user's games", body = ConnectionListResponse),
        (status = 404, description = "No such user", body = MessageResponse)
    )
)]
pub async fn get_user_connections(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Response {
    if state.repo.get_user(user_id).await.is_none() {
        return not_found(USER_GAMES_NOT_FOUND);
    }
    let connections = state.repo.get_user_connections(user_id).await;
    Json(ConnectionListResponse { connections }).into_response()
}

/// create_connection
///
/// [Authenticated Route] Submits a new game. The owner is taken from the
/// authenticated session; the payload must carry a complete 4x4 board.
#[utoipa::path(
    post,
    path = "/connections",
    request_body = CreateConnectionRequest,
    responses(
        (status = 201, description = "Created", body = Connection),
        (status = 400, description = "Board shape violation", body = MessageResponse)
    )
)]
pub async fn create_connection(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateConnectionRequest>,
) -> Response {
    if let Err(message) = payload.validate() {
        return bad_request(message);
    }
    match state.repo.create_connection(payload, user_id).await {
        Some(connection) => (StatusCode::CREATED, Json(connection)).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// update_connection
///
/// [Authenticated Route] Partially updates a game. Lookup first so the three
/// failure modes stay distinct: 404 when the game is absent, the 401
/// ownership payload when the caller is not the owner, 400 when a provided
/// field breaks the board contract.
#[utoipa::path(
    put,
    path = "/connections/{id}",
    params(("id" = i64, Path, description = "Connection ID")),
    request_body = UpdateConnectionRequest,
    responses(
        (status = 200, description = "Updated", body = Connection),
        (status = 400, description = "Board shape violation", body = MessageResponse),
        (status = 401, description = "Not the owner", body = OwnershipErrorResponse),
        (status = 404, description = "No such game", body = MessageResponse)
    )
)]
pub async fn update_connection(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateConnectionRequest>,
) -> Response {
    let Some(connection) = state.repo.get_connection(id).await else {
        return not_found(GAME_NOT_FOUND);
    };
    if connection.user_id != user_id {
        return ownership_error(user_id, connection.user_id);
    }

    // Only the owner of an existing game gets payload feedback.
    if let Err(message) = payload.validate() {
        return bad_request(message);
    }

    match state.repo.update_connection(id, payload).await {
        Some(updated) => Json(updated).into_response(),
        // The row vanished between the lookup and the update.
        None => not_found(GAME_NOT_FOUND),
    }
}

/// delete_connection
///
/// [Authenticated Route] Removes a game after the ownership check.
///
/// Behavior contract: absent id is a 404 with no side effects; a caller who
/// is not the owner gets the diagnostic 401 payload carrying both ids and the
/// record stays intact; the owner gets the success message once the row is gone.
#[utoipa::path(
    delete,
    path = "/connections/{id}",
    params(("id" = i64, Path, description = "Connection ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 401, description = "Not the owner", body = OwnershipErrorResponse),
        (status = 404, description = "No such game", body = MessageResponse)
    )
)]
pub async fn delete_connection(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let Some(connection) = state.repo.get_connection(id).await else {
        return not_found(GAME_NOT_FOUND);
    };

    if connection.user_id != user_id {
        return ownership_error(user_id, connection.user_id);
    }

    if state.repo.delete_connection(id).await {
        Json(MessageResponse::new(DELETE_SUCCESS)).into_response()
    } else {
        // Lost a race with a concurrent delete of the same row.
        not_found(GAME_NOT_FOUND)
    }
}
