use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use thiserror::Error;

use super::flag;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Urgency level. Stored and serialized as the bare integer, 1 being the most
/// urgent, so `ORDER BY priority` puts High first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(try_from = "i64", into = "i64")]
#[repr(i32)]
pub enum Priority {
    High = 1,
    #[default]
    Medium = 2,
    Low = 3,
}

impl TryFrom<i64> for Priority {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::High),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::Low),
            other => Err(ValidationError::InvalidPriority(other.to_string())),
        }
    }
}

impl From<Priority> for i64 {
    fn from(priority: Priority) -> Self {
        priority as i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title required")]
    TitleRequired,

    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("priority must be 1, 2 or 3, got {0:?}")]
    InvalidPriority(String),

    #[error("due_date year must be between 0000 and 9999, got {0}")]
    InvalidDueDate(NaiveDate),

    #[error("{name} must be one of 1, 0, true, false, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
}

/// A validated insert: title trimmed and non-empty, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl TryFrom<NewTaskRequest> for NewTask {
    type Error = ValidationError;

    fn try_from(req: NewTaskRequest) -> Result<Self, Self::Error> {
        let title = req
            .title
            .as_deref()
            .and_then(non_empty_trimmed)
            .ok_or(ValidationError::TitleRequired)?;

        Ok(Self {
            title,
            description: req.description.unwrap_or_default(),
            priority: req.priority.unwrap_or_default(),
            due_date: req.due_date.map(four_digit_year).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// Outer `None` leaves the date alone, `Some(None)` clears it.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "flag::deserialize_optional")]
    pub completed: Option<bool>,
}

/// The fields an update actually touches. Only `Some` fields end up in the
/// `SET` list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }
}

impl TryFrom<UpdateTaskRequest> for TaskChanges {
    type Error = ValidationError;

    fn try_from(req: UpdateTaskRequest) -> Result<Self, Self::Error> {
        let title = match req.title {
            Some(title) => {
                Some(non_empty_trimmed(&title).ok_or(ValidationError::TitleRequired)?)
            }
            None => None,
        };

        let due_date = match req.due_date {
            Some(date) => Some(date.map(four_digit_year).transpose()?),
            None => None,
        };

        let changes = Self {
            title,
            description: req.description,
            priority: req.priority,
            due_date,
            completed: req.completed,
        };

        if changes.is_empty() {
            return Err(ValidationError::NoFieldsToUpdate);
        }
        Ok(changes)
    }
}

fn non_empty_trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Dates are stored as `%F` text and ordered as strings, which only sorts
/// chronologically for four-digit years.
fn four_digit_year(date: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if (0..=9999).contains(&date.year()) {
        Ok(date)
    } else {
        Err(ValidationError::InvalidDueDate(date))
    }
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
