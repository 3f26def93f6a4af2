use std::sync::Arc;

use crate::config::{ApiMode, AppConfig};
use crate::database::{DatabaseManager, TodoRepository, UserRepository};

/// Shared by every handler: immutable configuration plus the storage handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub database: DatabaseManager,
}

impl AppState {
    pub fn new(config: AppConfig, database: DatabaseManager) -> Self {
        Self {
            config: Arc::new(config),
            database,
        }
    }

    pub fn mode(&self) -> ApiMode {
        self.config.mode
    }

    pub fn todos(&self) -> &dyn TodoRepository {
        self.database.todos()
    }

    pub fn users(&self) -> &dyn UserRepository {
        self.database.users()
    }
}
