use serde::Deserialize;

use super::flag;
use super::task::{Priority, ValidationError};

/// Raw `GET /api/tasks` query string. Values stay strings here so malformed
/// input turns into a readable 400 instead of a generic extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksParams {
    pub search: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<String>,
}

/// Conjunctive list filter. `None` means "don't filter on this column".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub search: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

impl TryFrom<ListTasksParams> for TaskFilter {
    type Error = ValidationError;

    fn try_from(params: ListTasksParams) -> Result<Self, Self::Error> {
        let search = params.search.filter(|s| !s.is_empty());

        let priority = match present(params.priority) {
            Some(raw) => {
                let value: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ValidationError::InvalidPriority(raw.clone()))?;
                Some(Priority::try_from(value).map_err(|_| ValidationError::InvalidPriority(raw))?)
            }
            None => None,
        };

        let completed = match present(params.completed) {
            Some(raw) => Some(flag::parse(&raw).ok_or(ValidationError::InvalidFlag {
                name: "completed",
                value: raw,
            })?),
            None => None,
        };

        Ok(Self {
            search,
            priority,
            completed,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
