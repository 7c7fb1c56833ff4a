pub mod error;
pub mod model;
pub mod schema;
pub mod storage;
pub mod task_service;

pub use error::AppError;
pub use task_service::{Persist, TaskService};
