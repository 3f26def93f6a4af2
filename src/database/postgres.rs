use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Subtask, Todo, User};
use crate::database::query_builder::QueryBuilder;
use crate::database::repository::{TodoRepository, UserRepository};
use crate::filter::{Filter, TodoFilter, TODO_TABLE};

/// PostgreSQL-backed repositories.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn scoped(id: Uuid, owner: Option<Uuid>) -> Result<Filter, DatabaseError> {
        let mut filter = Filter::new(TODO_TABLE)?;
        filter.where_eq("id", id);
        if let Some(owner) = owner {
            filter.where_eq("user_id", owner);
        }
        Ok(filter)
    }
}

/// Row shape of the `todos` table; `pk` only drives tie-breaking order.
#[derive(Debug, FromRow)]
struct TodoRow {
    id: Uuid,
    user_id: Option<Uuid>,
    title: String,
    description: Option<String>,
    completed: bool,
    priority: String,
    category: String,
    tags: Vec<String>,
    due_date: Option<DateTime<Utc>>,
    subtasks: Json<Vec<Subtask>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = DatabaseError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let priority = row
            .priority
            .parse()
            .map_err(|e| DatabaseError::CorruptRecord(format!("todo {}: {}", row.id, e)))?;
        Ok(Todo {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            priority,
            category: row.category,
            tags: row.tags,
            due_date: row.due_date,
            subtasks: row.subtasks.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TodoRepository for PgStore {
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, DatabaseError> {
        let rows = QueryBuilder::<TodoRow>::new(filter.to_filter()?)
            .select_all(&self.pool)
            .await?;
        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn find(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Todo>, DatabaseError> {
        QueryBuilder::<TodoRow>::new(Self::scoped(id, owner)?)
            .select_optional(&self.pool)
            .await?
            .map(Todo::try_from)
            .transpose()
    }

    async fn insert(&self, todo: &Todo) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"INSERT INTO todos
                (id, user_id, title, description, completed, priority, category, tags, due_date, subtasks, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
        )
        .bind(todo.id)
        .bind(todo.user_id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.priority.as_str())
        .bind(&todo.category)
        .bind(&todo.tags)
        .bind(todo.due_date)
        .bind(Json(&todo.subtasks))
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, todo: &Todo, owner: Option<Uuid>) -> Result<bool, DatabaseError> {
        let done = sqlx::query(
            r#"UPDATE todos SET
                title = $2, description = $3, completed = $4, priority = $5, category = $6,
                tags = $7, due_date = $8, subtasks = $9, updated_at = $10
               WHERE id = $1 AND ($11::uuid IS NULL OR user_id = $11)"#,
        )
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.priority.as_str())
        .bind(&todo.category)
        .bind(&todo.tags)
        .bind(todo.due_date)
        .bind(Json(&todo.subtasks))
        .bind(todo.updated_at)
        .bind(owner)
        .execute(&self.pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool, DatabaseError> {
        let removed = QueryBuilder::<TodoRow>::new(Self::scoped(id, owner)?)
            .delete(&self.pool)
            .await?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: &User) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DatabaseError::Conflict("Username already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
