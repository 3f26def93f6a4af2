pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod error;
pub mod todo_filter;

pub use types::*;
pub use error::FilterError;
pub use filter::Filter;
pub use todo_filter::{TodoFilter, TODO_TABLE};
