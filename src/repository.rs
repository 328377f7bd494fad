use crate::models::{
    Connection, ConnectionIndexInfo, CreateConnectionRequest, UpdateConnectionRequest, User,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations over the
/// `connections` and `users` tables. Handlers only ever see this trait, so the
/// Postgres implementation can be swapped for an in-memory one in tests.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's async task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Reads ---
    // All stored games, newest id first, reduced to the index projection.
    async fn get_connections(&self) -> Vec<ConnectionIndexInfo>;
    // Full projection of a single game by id.
    async fn get_connection(&self, id: i64) -> Option<Connection>;
    // A user's games, newest id first, index projection.
    async fn get_user_connections(&self, user_id: i64) -> Vec<ConnectionIndexInfo>;

    // --- Writes ---
    // Inserts a new game owned by `user_id` and returns the stored row.
    async fn create_connection(
        &self,
        req: CreateConnectionRequest,
        user_id: i64,
    ) -> Option<Connection>;
    // Partial update; unset fields keep their stored values. Ownership is
    // checked by the caller before this runs.
    async fn update_connection(
        &self,
        id: i64,
        req: UpdateConnectionRequest,
    ) -> Option<Connection>;
    // Removes the row. Returns true if a row was actually deleted.
    async fn delete_connection(&self, id: i64) -> bool;

    // --- Users ---
    // Identity lookup used by the auth extractor and the per-user listing.
    async fn get_user(&self, id: i64) -> Option<User>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// Queries use the runtime-checked `sqlx::query_as` form; failures are logged
/// and collapse to the empty/absent value, matching the handler contract that
/// database errors surface as server-side logs rather than response bodies.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CONNECTION_COLUMNS: &str = "id, user_id, title, categories, answers, created_at, updated_at";

#[async_trait]
impl Repository for PostgresRepository {
    /// Index listing for the public landing page. Descending id keeps the
    /// newest game first without needing a secondary sort key.
    async fn get_connections(&self) -> Vec<ConnectionIndexInfo> {
        sqlx::query_as::<_, ConnectionIndexInfo>(
            "SELECT id, user_id, title, created_at FROM connections ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_connections error: {:?}", e);
            vec![]
        })
    }

    async fn get_connection(&self, id: i64) -> Option<Connection> {
        let query = format!("SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = $1");
        sqlx::query_as::<_, Connection>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_connection error: {:?}", e);
                None
            })
    }

    async fn get_user_connections(&self, user_id: i64) -> Vec<ConnectionIndexInfo> {
        sqlx::query_as::<_, ConnectionIndexInfo>(
            "SELECT id, user_id, title, created_at FROM connections \
             WHERE user_id = $1 ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user_connections error: {:?}", e);
            vec![]
        })
    }

    /// Inserts a new game. The board shape has already been validated by the
    /// handler; the owner always comes from the authenticated session.
    async fn create_connection(
        &self,
        req: CreateConnectionRequest,
        user_id: i64,
    ) -> Option<Connection> {
        let query = format!(
            "INSERT INTO connections (user_id, title, categories, answers, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) \
             RETURNING {CONNECTION_COLUMNS}"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(user_id)
            .bind(req.title)
            .bind(req.categories)
            .bind(req.answers)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| tracing::error!("create_connection error: {:?}", e))
            .ok()
    }

    /// Partial update using COALESCE so only the provided fields change.
    /// `Option<T>` binds NULL for absent fields, which COALESCE skips.
    async fn update_connection(
        &self,
        id: i64,
        req: UpdateConnectionRequest,
    ) -> Option<Connection> {
        let query = format!(
            "UPDATE connections \
             SET title = COALESCE($2, title), \
                 categories = COALESCE($3, categories), \
                 answers = COALESCE($4, answers), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CONNECTION_COLUMNS}"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(id)
            .bind(req.title)
            .bind(req.categories)
            .bind(req.answers)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("update_connection error: {:?}", e);
                None
            })
    }

    async fn delete_connection(&self, id: i64) -> bool {
        match sqlx::query("DELETE FROM connections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_connection error: {:?}", e);
                false
            }
        }
    }

    async fn get_user(&self, id: i64) -> Option<User> {
        sqlx::query_as::<_, User>("SELECT id, username, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_user error: {:?}", e);
                None
            })
    }
}
