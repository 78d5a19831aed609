pub mod jwt;
mod types;

pub use types::Claims;
