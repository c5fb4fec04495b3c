pub mod repository;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::models::{NewTask, Task, TaskChanges, TaskFilter};

pub use repository::SqliteTaskStore;

/// Persistence seam for the task handlers. `AppState` holds one of these
/// behind an `Arc`, so tests can swap in their own implementation.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error>;
    async fn create_task(&self, task: NewTask) -> Result<Task, sqlx::Error>;
    /// Returns `None` when no task has this id.
    async fn update_task(&self, id: i64, changes: TaskChanges) -> Result<Option<Task>, sqlx::Error>;
    /// Returns whether a row was removed.
    async fn delete_task(&self, id: i64) -> Result<bool, sqlx::Error>;
    async fn ping(&self) -> Result<(), sqlx::Error>;
    async fn close(&self);
}

/// Opens the pool and applies the embedded migrations.
///
/// An in-memory database only lives as long as its connection, so
/// `sqlite::memory:` gets a single connection that is never recycled.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?
    };

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database ready at {}", database_url);

    Ok(pool)
}
