pub mod flag;
pub mod query;
pub mod task;

pub use query::{ListTasksParams, TaskFilter};
pub use task::{
    NewTask, NewTaskRequest, Priority, Task, TaskChanges, UpdateTaskRequest, ValidationError,
};
