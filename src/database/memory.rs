use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Todo, User};
use crate::database::repository::{TodoRepository, UserRepository};
use crate::filter::TodoFilter;

/// Process-local store for development and tests. Todos are kept in
/// insertion order so listing can break `created_at` ties newest-first.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<Vec<Todo>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned_by(todo: &Todo, id: Uuid, owner: Option<Uuid>) -> bool {
    todo.id == id && owner.map_or(true, |o| todo.user_id == Some(o))
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, DatabaseError> {
        let todos = self.todos.read().await;
        let mut found: Vec<Todo> = todos.iter().rev().filter(|t| filter.matches(t)).cloned().collect();
        // stable: equal timestamps keep reverse insertion order
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Todo>, DatabaseError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| owned_by(t, id, owner)).cloned())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), DatabaseError> {
        let mut todos = self.todos.write().await;
        if todos.iter().any(|t| t.id == todo.id) {
            return Err(DatabaseError::Conflict(format!("Todo {} already exists", todo.id)));
        }
        todos.push(todo.clone());
        Ok(())
    }

    async fn save(&self, todo: &Todo, owner: Option<Uuid>) -> Result<bool, DatabaseError> {
        let mut todos = self.todos.write().await;
        let Some(existing) = todos.iter_mut().find(|t| owned_by(t, todo.id, owner)) else {
            return Ok(false);
        };
        // identity and ownership stay with the stored record
        let user_id = existing.user_id;
        let created_at = existing.created_at;
        *existing = Todo { user_id, created_at, ..todo.clone() };
        Ok(true)
    }

    async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool, DatabaseError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| !owned_by(t, id, owner));
        Ok(todos.len() < before)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(DatabaseError::Conflict("Username already exists".to_string()));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(username).cloned())
    }
}
