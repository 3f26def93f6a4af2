use chrono::{DateTime, Duration, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Current time at the precision PostgreSQL stores (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid field '{field}': {problem}")]
pub struct ValidationError {
    pub field: String,
    pub problem: String,
}

impl ValidationError {
    fn new(field: &str, problem: &str) -> Self {
        Self { field: field.to_string(), problem: problem.to_string() }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("priority must be one of low, medium, high (got '{0}')")]
pub struct InvalidPriority(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(InvalidPriority(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub category: String,
    pub tags: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub subtasks: Vec<Subtask>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a create request. Server-managed fields are not accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: Priority,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subtasks: Vec<SubtaskInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update. `description` and `dueDate` distinguish "absent" from
/// an explicit `null`, which clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "timestamp::double_optional")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub subtasks: Option<Vec<SubtaskInput>>,
}

/// Fields a subtask update may touch; anything else in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubtaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl Todo {
    pub fn create(input: NewTodo, owner: Option<Uuid>) -> Result<Self, ValidationError> {
        let title = required_text("title", &input.title)?;
        let category = required_text("category", &input.category)?;
        let subtasks = build_subtasks(input.subtasks, &[])?;
        let created_at = now();

        Ok(Self {
            id: Uuid::new_v4(),
            user_id: owner,
            title,
            description: input.description,
            completed: false,
            priority: input.priority,
            category,
            tags: input.tags,
            due_date: input.due_date,
            subtasks,
            created_at,
            updated_at: created_at,
        })
    }

    /// Validates the whole change set before applying any of it.
    pub fn apply_update(&mut self, update: TodoUpdate) -> Result<(), ValidationError> {
        let title = update.title.as_deref().map(|t| required_text("title", t)).transpose()?;
        let category = update.category.as_deref().map(|c| required_text("category", c)).transpose()?;
        let subtasks = update
            .subtasks
            .map(|inputs| build_subtasks(inputs, &self.subtasks))
            .transpose()?;

        if let Some(title) = title { self.title = title; }
        if let Some(description) = update.description { self.description = description; }
        if let Some(completed) = update.completed { self.completed = completed; }
        if let Some(priority) = update.priority { self.priority = priority; }
        if let Some(category) = category { self.category = category; }
        if let Some(tags) = update.tags { self.tags = tags; }
        if let Some(due_date) = update.due_date { self.due_date = due_date; }
        if let Some(subtasks) = subtasks { self.subtasks = subtasks; }

        self.touch();
        Ok(())
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        self.touch();
    }

    pub fn subtask_mut(&mut self, subtask_id: Uuid) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| s.id == subtask_id)
    }

    /// Advance `updated_at`; it must move forward even within one clock tick.
    pub fn touch(&mut self) {
        let now = now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

impl Subtask {
    pub fn merge(&mut self, patch: SubtaskPatch) -> Result<(), ValidationError> {
        if let Some(title) = patch.title {
            self.title = required_text("title", &title)?;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        Ok(())
    }
}

/// Whitespace-only values are rejected; accepted values are stored as sent.
fn required_text(field: &str, value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(value.to_string())
}

/// A supplied subtask id survives only if it names one of `existing` and no
/// earlier entry in the same list claimed it. Every other entry gets a fresh id.
fn build_subtasks(inputs: Vec<SubtaskInput>, existing: &[Subtask]) -> Result<Vec<Subtask>, ValidationError> {
    let mut claimed = HashSet::with_capacity(inputs.len());
    inputs
        .into_iter()
        .map(|input| {
            let title = required_text("title", &input.title)
                .map_err(|_| ValidationError::new("subtasks", "every subtask needs a title"))?;
            let id = match input.id {
                Some(id) if existing.iter().any(|s| s.id == id) && claimed.insert(id) => id,
                _ => Uuid::new_v4(),
            };
            Ok(Subtask {
                id,
                title,
                completed: input.completed,
            })
        })
        .collect()
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Due dates arrive either as RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
mod timestamp {
    use super::*;
    use serde::de::Error;

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Ok(ts.with_timezone(&Utc).trunc_subsecs(6));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or_else(|| format!("invalid date '{}', expected RFC 3339 or YYYY-MM-DD", raw))
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw).map(Some).map_err(D::Error::custom),
            None => Ok(None),
        }
    }

    pub fn double_optional<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        optional(deserializer).map(Some)
    }
}
