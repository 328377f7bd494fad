#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use connections_api::{
    AppState,
    config::AppConfig,
    models::{
        Connection, ConnectionIndexInfo, CreateConnectionRequest, UpdateConnectionRequest, User,
    },
    repository::{Repository, RepositoryState},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// Well-known identities used across the test files. IRA owns the games,
// BOB is the authenticated non-owner.
pub const IRA: i64 = 9;
pub const BOB: i64 = 3;

/// InMemoryRepository
///
/// A stateful test double for the `Repository` trait. Unlike a canned-response
/// mock, it keeps real rows behind a `Mutex` so the ordering, filtering, and
/// ownership properties of the handlers are actually exercised.
pub struct InMemoryRepository {
    inner: Mutex<Inner>,
}

struct Inner {
    next_id: i64,
    connections: Vec<Connection>,
    users: HashMap<i64, User>,
}

impl InMemoryRepository {
    /// Empty store preseeded with the two well-known users.
    pub fn seeded() -> Self {
        let mut users = HashMap::new();
        users.insert(
            IRA,
            User {
                id: IRA,
                username: "ira".to_string(),
                email: "ira@example.com".to_string(),
            },
        );
        users.insert(
            BOB,
            User {
                id: BOB,
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
            },
        );
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                connections: vec![],
                users,
            }),
        }
    }

    /// Inserts a row directly, bypassing the handler layer. Returns its id.
    pub fn seed_connection(&self, user_id: i64, title: &str) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let now = Utc::now();
        inner.connections.push(Connection {
            id,
            user_id,
            title: title.to_string(),
            categories: sample_categories(),
            answers: sample_answers(),
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn contains(&self, id: i64) -> bool {
        self.inner
            .lock()
            .unwrap()
            .connections
            .iter()
            .any(|c| c.id == id)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_connections(&self) -> Vec<ConnectionIndexInfo> {
        let inner = self.inner.lock().unwrap();
        let mut list: Vec<_> = inner.connections.iter().map(|c| c.index_info()).collect();
        list.sort_by(|a, b| b.id.cmp(&a.id));
        list
    }

    async fn get_connection(&self, id: i64) -> Option<Connection> {
        let inner = self.inner.lock().unwrap();
        inner.connections.iter().find(|c| c.id == id).cloned()
    }

    async fn get_user_connections(&self, user_id: i64) -> Vec<ConnectionIndexInfo> {
        let inner = self.inner.lock().unwrap();
        let mut list: Vec<_> = inner
            .connections
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.index_info())
            .collect();
        list.sort_by(|a, b| b.id.cmp(&a.id));
        list
    }

    async fn create_connection(
        &self,
        req: CreateConnectionRequest,
        user_id: i64,
    ) -> Option<Connection> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let now = Utc::now();
        let connection = Connection {
            id,
            user_id,
            title: req.title,
            categories: req.categories,
            answers: req.answers,
            created_at: now,
            updated_at: now,
        };
        inner.connections.push(connection.clone());
        Some(connection)
    }

    async fn update_connection(
        &self,
        id: i64,
        req: UpdateConnectionRequest,
    ) -> Option<Connection> {
        let mut inner = self.inner.lock().unwrap();
        let connection = inner.connections.iter_mut().find(|c| c.id == id)?;
        if let Some(title) = req.title {
            connection.title = title;
        }
        if let Some(categories) = req.categories {
            connection.categories = categories;
        }
        if let Some(answers) = req.answers {
            connection.answers = answers;
        }
        connection.updated_at = Utc::now();
        Some(connection.clone())
    }

    async fn delete_connection(&self, id: i64) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.connections.len();
        inner.connections.retain(|c| c.id != id);
        inner.connections.len() < before
    }

    async fn get_user(&self, id: i64) -> Option<User> {
        self.inner.lock().unwrap().users.get(&id).cloned()
    }
}

// --- Shared Fixtures ---

pub fn sample_categories() -> Vec<String> {
    vec!["Colors", "Planets", "Rivers", "Metals"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn sample_answers() -> Vec<String> {
    [
        "RED", "BLUE", "GREEN", "TEAL", "MARS", "VENUS", "PLUTO", "SATURN", "NILE", "AMAZON",
        "DANUBE", "VOLGA", "IRON", "ZINC", "GOLD", "COPPER",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn sample_create_request(title: &str) -> CreateConnectionRequest {
    CreateConnectionRequest {
        title: title.to_string(),
        categories: sample_categories(),
        answers: sample_answers(),
    }
}

/// Assembles an AppState around a shared in-memory repository. The returned
/// Arc lets tests inspect and seed the store directly.
pub fn test_state() -> (AppState, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::seeded());
    let state = AppState {
        repo: repo.clone() as RepositoryState,
        config: AppConfig::default(),
    };
    (state, repo)
}
