mod entry;
mod health;
pub mod todos;

pub use entry::{app, router};
