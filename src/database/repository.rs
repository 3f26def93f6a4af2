use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Todo, User};
use crate::filter::TodoFilter;

/// Todo persistence. `owner` scopes a lookup to one user's records; `None`
/// means unscoped (open mode).
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, DatabaseError>;

    async fn find(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Todo>, DatabaseError>;

    async fn insert(&self, todo: &Todo) -> Result<(), DatabaseError>;

    /// Overwrite the mutable fields of an existing record. Returns `false`
    /// when nothing matched `(todo.id, owner)`.
    async fn save(&self, todo: &Todo, owner: Option<Uuid>) -> Result<bool, DatabaseError>;

    /// Returns `false` when nothing matched.
    async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool, DatabaseError>;

    async fn find_404(&self, id: Uuid, owner: Option<Uuid>) -> Result<Todo, DatabaseError> {
        self.find(id, owner)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Todo not found".to_string()))
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DatabaseError::Conflict` when the username is taken.
    async fn create(&self, user: &User) -> Result<(), DatabaseError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
}
