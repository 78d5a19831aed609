pub mod error;
pub mod todo_dao;

pub use error::{DaoLayerError, DaoResult};
pub use todo_dao::TodoDao;
