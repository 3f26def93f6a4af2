// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Health reporting and token acquisition. Input here comes from anonymous
// callers, so every field is validated before it reaches storage.

pub mod auth;
pub mod health;

pub use health::health_get;
