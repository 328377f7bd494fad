use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Canonical identity record stored in the `public.users` table. Only the
/// fields the auth extractor and the ownership checks need are resolved here;
/// credential handling lives with the external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Connection
///
/// One stored Connections word-puzzle game from the `public.connections` table.
/// This is the **full projection** returned by the detail endpoint.
///
/// Board layout contract (shared with the frontend): `categories` holds the
/// 4 group labels, `answers` holds all 16 words, and the contiguous slice
/// `answers[4k..4k+4]` belongs to `categories[k]`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Connection {
    pub id: i64,
    // FK to public.users.id (Owner). Checked against the caller on delete/update.
    pub user_id: i64,
    pub title: String,
    pub categories: Vec<String>,
    pub answers: Vec<String>,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// ConnectionIndexInfo
///
/// The **index projection**: the reduced field set used by list views.
/// Deliberately excludes the board content so listings stay light and do not
/// spoil puzzles the viewer has not opened yet.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ConnectionIndexInfo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl Connection {
    /// Reduces the full row to its listing projection.
    pub fn index_info(&self) -> ConnectionIndexInfo {
        ConnectionIndexInfo {
            id: self.id,
            user_id: self.user_id,
            title: self.title.clone(),
            created_at: self.created_at,
        }
    }
}

// The board shape every stored game must satisfy.
pub const CATEGORY_COUNT: usize = 4;
pub const ANSWER_COUNT: usize = 16;

/// --- Request Payloads (Input Schemas) ---

/// CreateConnectionRequest
///
/// Input payload for submitting a new game (POST /connections). The owner is
/// always the authenticated caller; `user_id` is never client-supplied.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateConnectionRequest {
    pub title: String,
    pub categories: Vec<String>,
    pub answers: Vec<String>,
}

impl CreateConnectionRequest {
    /// Checks the 4-categories / 16-answers board contract.
    /// Returns a client-facing message on the first violation found.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Title must not be empty");
        }
        validate_board(Some(&self.categories), Some(&self.answers))
    }
}

/// UpdateConnectionRequest
///
/// Partial update payload for PUT /connections/{id}.
///
/// Uses `Option<T>` for all fields and `#[serde(skip_serializing_if = "Option::is_none")]`
/// so only the provided fields appear in the JSON payload and only those
/// columns are touched by the update.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateConnectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<String>>,
}

impl UpdateConnectionRequest {
    /// Provided fields must still satisfy the board contract; absent fields
    /// keep their stored values and need no check.
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err("Title must not be empty");
            }
        }
        validate_board(self.categories.as_ref(), self.answers.as_ref())
    }
}

fn validate_board(
    categories: Option<&Vec<String>>,
    answers: Option<&Vec<String>>,
) -> Result<(), &'static str> {
    if let Some(categories) = categories {
        if categories.len() != CATEGORY_COUNT {
            return Err("A Connections game needs exactly 4 categories");
        }
        if categories.iter().any(|c| c.trim().is_empty()) {
            return Err("Categories must not be empty");
        }
    }
    if let Some(answers) = answers {
        if answers.len() != ANSWER_COUNT {
            return Err("A Connections game needs exactly 16 answers");
        }
        if answers.iter().any(|a| a.trim().is_empty()) {
            return Err("Answers must not be empty");
        }
    }
    Ok(())
}

/// --- Response Envelopes (Output Schemas) ---

/// ConnectionListResponse
///
/// Wrapper used by both listing endpoints: `{"connections": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ConnectionListResponse {
    pub connections: Vec<ConnectionIndexInfo>,
}

/// MessageResponse
///
/// Plain `{"message": ...}` body used for not-found and delete-success replies.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// OwnershipErrorResponse
///
/// Diagnostic 401 body returned when an authenticated caller targets a game
/// they do not own. The camelCase keys are part of the wire contract consumed
/// by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct OwnershipErrorResponse {
    pub error: String,
    #[serde(rename = "currentUser")]
    pub current_user: i64,
    #[serde(rename = "connectionAuthor")]
    pub connection_author: i64,
}
