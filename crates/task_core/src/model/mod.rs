mod task;

pub use task::{Task, TaskCategory, TaskPriority, TaskStatus, UnknownVariant, deadline_format};
