pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use app::build_router;
pub use state::AppState;

#[cfg(test)]
pub mod testing;
