//! Payloads accepted by the task store and the rules they must satisfy.
//!
//! Raw payloads (`TaskDraft`, `TaskPatch`) carry text exactly as it arrived
//! from the command line. `validate` turns them into typed payloads
//! (`NewTask`, `TaskUpdate`) or a `validation_error` naming every bad field.

use crate::error::{AppError, FieldError};
use crate::model::{Task, TaskCategory, TaskPriority, TaskStatus, deadline_format};
use std::str::FromStr;
use time::Date;

/// Creation payload as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub deadline: String,
    pub priority: String,
}

/// Validated creation payload. The store assigns `id` and `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub category: TaskCategory,
    pub deadline: Date,
    pub priority: TaskPriority,
}

/// Update payload as typed by the user; `None` means the option was not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

/// Validated partial update. Only `Some` fields are written to the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<TaskCategory>,
    pub deadline: Option<Date>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<NewTask, AppError> {
        let mut errors = Vec::new();

        let name = check_name(&self.name, &mut errors);
        let category = check_enum::<TaskCategory>("category", &self.category, &mut errors);
        let deadline = check_deadline(&self.deadline, &mut errors);
        let priority = check_enum::<TaskPriority>("priority", &self.priority, &mut errors);

        match (name, category, deadline, priority) {
            (Some(name), Some(category), Some(deadline), Some(priority)) => {
                Ok(NewTask {
                    name,
                    description: self.description.clone(),
                    category,
                    deadline,
                    priority,
                })
            }
            _ => Err(AppError::validation(errors)),
        }
    }
}

impl TaskPatch {
    pub fn validate(&self) -> Result<TaskUpdate, AppError> {
        let mut errors = Vec::new();

        let update = TaskUpdate {
            name: self
                .name
                .as_deref()
                .and_then(|value| check_name(value, &mut errors)),
            description: self.description.clone(),
            category: self
                .category
                .as_deref()
                .and_then(|value| check_enum("category", value, &mut errors)),
            deadline: self
                .deadline
                .as_deref()
                .and_then(|value| check_deadline(value, &mut errors)),
            priority: self
                .priority
                .as_deref()
                .and_then(|value| check_enum("priority", value, &mut errors)),
            status: self
                .status
                .as_deref()
                .and_then(|value| check_enum("status", value, &mut errors)),
        };

        if errors.is_empty() {
            Ok(update)
        } else {
            Err(AppError::validation(errors))
        }
    }
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.deadline.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    /// Writes every supplied field onto `task`, leaving the rest untouched.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

/// Checks a record read back from disk. Enum and date shapes are already
/// enforced by deserialization, so only the text invariants remain.
pub fn check_record(task: &Task) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if task.id.trim().is_empty() {
        errors.push(FieldError::new("id", "must not be blank"));
    }
    check_name(&task.name, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(errors))
    }
}

fn check_name(value: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    if value.trim().is_empty() {
        errors.push(FieldError::new("name", "the task must have a name"));
        None
    } else {
        Some(value.to_string())
    }
}

fn check_enum<T>(field: &'static str, value: &str, errors: &mut Vec<FieldError>) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            errors.push(FieldError::new(field, err.to_string()));
            None
        }
    }
}

fn check_deadline(value: &str, errors: &mut Vec<FieldError>) -> Option<Date> {
    match deadline_format::parse(value) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(
                "deadline",
                format!("'{value}' is not a valid date in YYYY-MM-DD format"),
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskDraft, TaskPatch, TaskUpdate, check_record};
    use crate::model::{Task, TaskCategory, TaskPriority, TaskStatus};
    use time::macros::date;

    fn draft(name: &str, category: &str, deadline: &str, priority: &str) -> TaskDraft {
        TaskDraft {
            name: name.to_string(),
            description: "test task".to_string(),
            category: category.to_string(),
            deadline: deadline.to_string(),
            priority: priority.to_string(),
        }
    }

    #[test]
    fn draft_validates_into_typed_payload() {
        let task = draft("Task 1", "work", "2024-12-21", "high")
            .validate()
            .unwrap();

        assert_eq!(task.name, "Task 1");
        assert_eq!(task.description, "test task");
        assert_eq!(task.category, TaskCategory::Work);
        assert_eq!(task.deadline, date!(2024 - 12 - 21));
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn draft_allows_empty_description() {
        let mut raw = draft("Task 2", "study", "2024-12-22", "normal");
        raw.description = String::new();

        assert_eq!(raw.validate().unwrap().description, "");
    }

    #[test]
    fn draft_rejects_invalid_values() {
        let cases = [
            (draft("", "personal", "2024-12-22", "normal"), "name"),
            (draft("   ", "personal", "2024-12-22", "normal"), "name"),
            (draft("Task 6", "work", "2024-20-08", "low"), "deadline"),
            (draft("Task 7", "work", "", "low"), "deadline"),
            (draft("Task 13", "personal", "2024 12 22", "normal"), "deadline"),
            (draft("Task 14", "personal", "2024:12:22", "normal"), "deadline"),
            (draft("Task 15", "hobby", "2024-12-22", "normal"), "category"),
            (draft("Task 16", "work", "2024-12-22", "urgent"), "priority"),
        ];

        for (raw, field) in cases {
            let err = raw.validate().unwrap_err();
            assert_eq!(err.code(), "validation_error", "{raw:?}");
            assert_eq!(err.fields(), [field.to_string()], "{raw:?}");
        }
    }

    #[test]
    fn draft_reports_all_offending_fields() {
        let err = draft(" ", "hobby", "2024-13-01", "urgent")
            .validate()
            .unwrap_err();

        assert_eq!(
            err.fields(),
            [
                "name".to_string(),
                "category".to_string(),
                "deadline".to_string(),
                "priority".to_string()
            ]
        );
    }

    #[test]
    fn empty_patch_is_an_empty_update() {
        let update = TaskPatch::default().validate().unwrap();
        assert!(update.is_empty());
        assert_eq!(update, TaskUpdate::default());
    }

    #[test]
    fn patch_validates_only_supplied_fields() {
        let patch = TaskPatch {
            status: Some("completed".to_string()),
            deadline: Some("2024-12-20".to_string()),
            ..TaskPatch::default()
        };

        let update = patch.validate().unwrap();

        assert_eq!(update.status, Some(TaskStatus::Completed));
        assert_eq!(update.deadline, Some(date!(2024 - 12 - 20)));
        assert_eq!(update.name, None);
        assert_eq!(update.category, None);
    }

    #[test]
    fn patch_rejects_blank_name_and_unknown_status() {
        let patch = TaskPatch {
            name: Some(" ".to_string()),
            status: Some("done".to_string()),
            ..TaskPatch::default()
        };

        let err = patch.validate().unwrap_err();
        assert_eq!(err.fields(), ["name".to_string(), "status".to_string()]);
    }

    #[test]
    fn update_applies_only_supplied_fields() {
        let mut task = Task {
            id: "task-1".to_string(),
            name: "before".to_string(),
            description: "keep me".to_string(),
            status: TaskStatus::NotCompleted,
            priority: TaskPriority::Low,
            category: TaskCategory::Study,
            deadline: date!(2025 - 01 - 01),
        };
        let original = task.clone();

        TaskUpdate {
            name: Some("after".to_string()),
            ..TaskUpdate::default()
        }
        .apply_to(&mut task);

        assert_eq!(task.name, "after");
        assert_eq!(task.description, original.description);
        assert_eq!(task.status, original.status);
        assert_eq!(task.priority, original.priority);
        assert_eq!(task.category, original.category);
        assert_eq!(task.deadline, original.deadline);
    }

    #[test]
    fn check_record_rejects_blank_text_fields() {
        let task = Task {
            id: " ".to_string(),
            name: String::new(),
            description: String::new(),
            status: TaskStatus::NotCompleted,
            priority: TaskPriority::Low,
            category: TaskCategory::Study,
            deadline: date!(2025 - 01 - 01),
        };

        let err = check_record(&task).unwrap_err();
        assert_eq!(err.fields(), ["id".to_string(), "name".to_string()]);
    }
}
