// api/mod.rs - Request extraction shared by all handlers

pub mod extract;

pub use extract::{ApiJson, ApiQuery};
