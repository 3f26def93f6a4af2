// handlers/protected/todos/mod.rs - Todo CRUD handlers

pub mod create;  // POST /api/todos
pub mod filter;  // GET /api/todos/filter?priorities=...
pub mod list;    // GET /api/todos
pub mod record;  // GET|PUT|DELETE /api/todos/:id, PATCH /api/todos/:id/toggle
pub mod subtask; // PUT /api/todos/:id/subtasks/:subtaskId
pub mod utils;

pub use create::create_post;
pub use filter::filter_get;
pub use list::list_get;
pub use record::delete as record_delete;
pub use record::get as record_get;
pub use record::put as record_put;
pub use record::toggle as record_toggle;
pub use subtask::put as subtask_put;
