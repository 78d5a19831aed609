pub mod connection;
pub mod dao;
pub mod entities;
pub mod memory;
pub mod providers;
pub mod store;

pub use memory::InMemoryTodoStore;
pub use store::{NewTodo, TodoStore};
