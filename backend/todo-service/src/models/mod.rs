/// Data models for Todo Service
pub mod todo;

pub use todo::{CreateTodoRequest, Todo, TodoPatch, UpdateTodoRequest};
