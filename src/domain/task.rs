use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::domain::project::{normalize_text, ProjectId};
use crate::error::{DevboardError, Result};

/// Unique identifier for a task, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generates a fresh random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for TaskId {
    type Err = DevboardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DevboardError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of work owned by exactly one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds the stored record for a validated creation request
    pub fn from_new(id: TaskId, new: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            project_id: new.project_id,
            title: new.title,
            description: new.description,
            is_completed: new.is_completed,
            due_date: new.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the task is open and its due date has passed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed && self.due_date.map(|due| due < today).unwrap_or(false)
    }

    /// Moves `updated_at` forward, never backward
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Applies a validated patch and bumps `updated_at`
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) -> Result<()> {
        let title = patch.title.as_deref().map(validate_title).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = project_id;
        }
        if let Some(description) = patch.description {
            self.description = normalize_text(description);
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        self.touch(now);
        Ok(())
    }
}

/// Input for creating a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub project_id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            is_completed: false,
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }

    /// Checks required fields and returns the normalized request
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            title: validate_title(&self.title)?,
            description: normalize_text(self.description),
            ..self
        })
    }
}

/// Partial update for a task. `None` leaves a field untouched; for
/// nullable columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// Patch that only sets the completion flag
    pub fn completion(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DevboardError::Validation("Task title is required".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Task {
        let new = NewTask::new(ProjectId::new(), "Write docs").validate().unwrap();
        Task::from_new(TaskId::new(), new, Utc::now())
    }

    #[test]
    fn test_task_id_parsing() {
        let id = TaskId::new();
        assert_eq!(TaskId::from_str(&id.to_string()).unwrap(), id);
        assert!(matches!(
            TaskId::from_str("task1"),
            Err(DevboardError::InvalidId(_))
        ));
    }

    #[test]
    fn test_new_task_defaults() {
        let task = sample();
        assert!(!task.is_completed);
        assert!(task.description.is_none());
        assert!(task.due_date.is_none());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_new_task_requires_title() {
        let result = NewTask::new(ProjectId::new(), " ").validate();
        assert!(matches!(result, Err(DevboardError::Validation(_))));
    }

    #[test]
    fn test_new_task_blank_description_becomes_none() {
        let new = NewTask::new(ProjectId::new(), "New Task")
            .with_description("")
            .validate()
            .unwrap();
        assert!(new.description.is_none());
    }

    #[test]
    fn test_completion_patch() {
        let mut task = sample();
        let later = task.updated_at + chrono::Duration::seconds(1);
        task.apply(TaskPatch::completion(true), later).unwrap();

        assert!(task.is_completed);
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn test_patch_clears_due_date() {
        let mut task = sample();
        task.apply(
            TaskPatch {
                due_date: Some(Some(date(2024, 3, 10))),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(task.due_date, Some(date(2024, 3, 10)));

        task.apply(
            TaskPatch {
                due_date: Some(None),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_patch_with_blank_title_is_rejected_untouched() {
        let mut task = sample();
        let snapshot = task.clone();
        let patch = TaskPatch {
            title: Some(String::new()),
            is_completed: Some(true),
            ..Default::default()
        };
        assert!(task.apply(patch, Utc::now()).is_err());
        assert_eq!(task, snapshot);
    }

    #[test]
    fn test_is_overdue() {
        let mut task = sample();
        let today = date(2024, 3, 10);
        assert!(!task.is_overdue(today));

        task.due_date = Some(date(2024, 3, 9));
        assert!(task.is_overdue(today));

        task.is_completed = true;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn test_task_serialization_shape() {
        let mut task = sample();
        task.due_date = Some(date(2024, 3, 10));
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["due_date"], "2024-03-10");
        assert_eq!(json["is_completed"], false);
        assert_eq!(json["project_id"], task.project_id.to_string());
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{
            "id": "0b6a9d53-3f2b-4d0a-8d43-1a7c2f0f8e21",
            "project_id": "6f1c1f0e-6f5b-4a8e-9a2a-0f4f1b9b6a11",
            "title": "Old Task",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.is_completed);
        assert!(task.due_date.is_none());
    }
}
