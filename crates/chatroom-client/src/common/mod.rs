pub mod commands;
pub mod task;

pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskState, Tasks};
