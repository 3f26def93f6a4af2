pub mod todo;
pub mod user;

pub use todo::{
    now, InvalidPriority, NewTodo, Priority, Subtask, SubtaskInput, SubtaskPatch, Todo, TodoUpdate,
    ValidationError,
};
pub use user::User;
