use uuid::Uuid;

use crate::database::models::{Priority, Todo};

use super::error::FilterError;
use super::filter::Filter;
use super::types::{FilterOp, FilterWhereInfo, SqlParam};

pub const TODO_TABLE: &str = "todos";

/// Query-string filters for listing todos, shared by every storage backend.
///
/// Empty strings are treated as absent. `search` is a literal,
/// case-insensitive substring match against title, description or any tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoFilter {
    pub owner: Option<Uuid>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub priorities: Option<Vec<Priority>>,
    pub completed: Option<bool>,
    pub search: Option<String>,
}

impl TodoFilter {
    pub fn owned_by(owner: Option<Uuid>) -> Self {
        Self { owner, ..Default::default() }
    }

    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = non_empty(category);
        self
    }

    pub fn priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn priorities(mut self, priorities: Vec<Priority>) -> Self {
        self.priorities = Some(priorities);
        self
    }

    pub fn completed(mut self, completed: Option<bool>) -> Self {
        self.completed = completed;
        self
    }

    pub fn search(mut self, search: Option<String>) -> Self {
        self.search = non_empty(search);
        self
    }

    /// In-process evaluation, used by the memory store.
    pub fn matches(&self, todo: &Todo) -> bool {
        if let Some(owner) = self.owner {
            if todo.user_id != Some(owner) { return false; }
        }
        if let Some(category) = &self.category {
            if &todo.category != category { return false; }
        }
        if let Some(priority) = self.priority {
            if todo.priority != priority { return false; }
        }
        if let Some(priorities) = &self.priorities {
            if !priorities.contains(&todo.priority) { return false; }
        }
        if let Some(completed) = self.completed {
            if todo.completed != completed { return false; }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = todo.title.to_lowercase().contains(&needle)
                || todo.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&needle))
                || todo.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !hit { return false; }
        }
        true
    }

    /// SQL rendition of the same predicate, newest first.
    pub fn to_filter(&self) -> Result<Filter, FilterError> {
        let mut filter = Filter::new(TODO_TABLE)?;
        if let Some(owner) = self.owner {
            filter.where_eq("user_id", owner);
        }
        if let Some(category) = &self.category {
            filter.where_eq("category", category.as_str());
        }
        if let Some(priority) = self.priority {
            filter.where_eq("priority", priority.as_str());
        }
        if let Some(priorities) = &self.priorities {
            let values = priorities.iter().map(|p| SqlParam::from(p.as_str())).collect();
            filter.where_in("priority", values);
        }
        if let Some(completed) = self.completed {
            filter.where_eq("completed", completed);
        }
        if let Some(search) = &self.search {
            let pattern = format!("%{}%", escape_like(search));
            filter.where_any(vec![
                ilike("title", FilterOp::ILike, &pattern),
                ilike("description", FilterOp::ILike, &pattern),
                ilike("tags", FilterOp::AnyILike, &pattern),
            ]);
        }
        filter.order("created_at desc, pk desc")?;
        Ok(filter)
    }
}

fn ilike(column: &str, operator: FilterOp, pattern: &str) -> FilterWhereInfo {
    FilterWhereInfo::Field {
        column: column.to_string(),
        operator,
        data: SqlParam::from(pattern),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Escape LIKE metacharacters so user input matches literally.
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
