use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::repository::{TodoRepository, UserRepository};
use crate::filter::FilterError;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<FilterError> for DatabaseError {
    fn from(err: FilterError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Memory,
    Postgres(PgPool),
}

/// Owns the storage backend and hands out repositories.
#[derive(Clone)]
pub struct DatabaseManager {
    backend: Backend,
    todos: Arc<dyn TodoRepository>,
    users: Arc<dyn UserRepository>,
}

impl DatabaseManager {
    /// Connect using `DATABASE_URL`; `memory` selects the in-process store.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let raw = config.url.as_deref().ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        if config.is_memory() {
            info!("Using in-memory storage; data is lost on shutdown");
            return Ok(Self::memory());
        }

        let url = url::Url::parse(raw).map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(raw)
            .await?;
        info!("Created database pool for: {}", config.redacted_url());

        ensure_schema(&pool).await?;
        Ok(Self::postgres(pool))
    }

    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            backend: Backend::Memory,
            todos: store.clone(),
            users: store,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool.clone()));
        Self {
            backend: Backend::Postgres(pool),
            todos: store.clone(),
            users: store,
        }
    }

    pub fn todos(&self) -> &dyn TodoRepository {
        self.todos.as_ref()
    }

    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory => "memory",
            Backend::Postgres(_) => "postgres",
        }
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.backend {
            Backend::Memory => Ok(()),
            Backend::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
        }
    }

    pub async fn close(&self) {
        if let Backend::Postgres(pool) = &self.backend {
            pool.close().await;
            info!("Database pool closed");
        }
    }
}

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS todos (
        pk BIGSERIAL PRIMARY KEY,
        id UUID NOT NULL UNIQUE,
        user_id UUID REFERENCES users(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT,
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        priority TEXT NOT NULL CHECK (priority IN ('low', 'medium', 'high')),
        category TEXT NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        due_date TIMESTAMPTZ,
        subtasks JSONB NOT NULL DEFAULT '[]',
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        CHECK (updated_at >= created_at)
    )"#,
    r#"CREATE INDEX IF NOT EXISTS todos_user_created_idx ON todos (user_id, created_at DESC)"#,
];

/// Create tables on first start. Statements run one at a time because the
/// extended query protocol rejects multi-statement strings.
async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>) -> DatabaseConfig {
        DatabaseConfig {
            url: url.map(str::to_string),
            max_connections: 1,
            connection_timeout: 1,
        }
    }

    #[tokio::test]
    async fn connect_memory_backend() {
        let db = DatabaseManager::connect(&config(Some("memory://"))).await.unwrap();
        assert_eq!(db.backend_name(), "memory");
        assert!(db.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn connect_requires_url() {
        let err = DatabaseManager::connect(&config(None)).await.err().unwrap();
        assert!(matches!(err, DatabaseError::ConfigMissing("DATABASE_URL")));
    }

    #[tokio::test]
    async fn connect_rejects_foreign_scheme() {
        let err = DatabaseManager::connect(&config(Some("mysql://localhost/todos"))).await.err().unwrap();
        assert!(matches!(err, DatabaseError::InvalidDatabaseUrl(_)));
    }
}
