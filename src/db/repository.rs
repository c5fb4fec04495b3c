use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::TaskStore;
use crate::models::{NewTask, Task, TaskChanges, TaskFilter};

const TASK_COLUMNS: &str = "id, title, description, priority, due_date, completed, created_at";

/// High priority first, dated tasks before undated ones, earliest due date
/// first, newest first. `id` breaks ties between rows created in the same
/// instant.
const TASK_ORDER: &str =
    " ORDER BY priority ASC, due_date IS NULL, due_date ASC, created_at DESC, id DESC";

#[derive(Clone)]
pub struct SqliteTaskStore {
    db: SqlitePool,
}

impl SqliteTaskStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
        qb.push(TASK_COLUMNS).push(" FROM tasks WHERE 1=1");

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR description LIKE ")
                .push_bind(pattern)
                .push(r" ESCAPE '\')");
        }
        if let Some(priority) = filter.priority {
            qb.push(" AND priority = ").push_bind(priority);
        }
        if let Some(completed) = filter.completed {
            qb.push(" AND completed = ").push_bind(completed);
        }
        qb.push(TASK_ORDER);

        let tasks = qb.build_query_as::<Task>().fetch_all(&self.db).await?;
        debug!(?filter, count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO tasks
                (title, description, priority, due_date, completed, created_at)
            VALUES (?1, ?2, ?3, ?4, 0, ?5)
            RETURNING {TASK_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.title)
            .bind(task.description)
            .bind(task.priority)
            .bind(task.due_date)
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await?;

        debug!(id = created.id, "created task");
        Ok(created)
    }

    async fn update_task(&self, id: i64, changes: TaskChanges) -> Result<Option<Task>, sqlx::Error> {
        if changes.is_empty() {
            return self.find_task_by_id(id).await;
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE tasks SET ");
        let mut set = qb.separated(", ");
        if let Some(title) = changes.title {
            set.push("title = ").push_bind_unseparated(title);
        }
        if let Some(description) = changes.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(priority) = changes.priority {
            set.push("priority = ").push_bind_unseparated(priority);
        }
        if let Some(due_date) = changes.due_date {
            set.push("due_date = ").push_bind_unseparated(due_date);
        }
        if let Some(completed) = changes.completed {
            set.push("completed = ").push_bind_unseparated(completed);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(TASK_COLUMNS);

        let updated = qb.build_query_as::<Task>().fetch_optional(&self.db).await?;
        debug!(id, found = updated.is_some(), "updated task");
        Ok(updated)
    }

    async fn delete_task(&self, id: i64) -> Result<bool, sqlx::Error> {
        let removed = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();

        debug!(id, removed, "deleted task");
        Ok(removed > 0)
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("select 1").execute(&self.db).await?;
        Ok(())
    }

    async fn close(&self) {
        self.db.close().await;
    }
}

/// Escapes LIKE wildcards so the search text matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
