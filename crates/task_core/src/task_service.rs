use crate::error::AppError;
use crate::model::{Task, TaskCategory, TaskStatus};
use crate::schema::{NewTask, TaskUpdate};
use crate::storage::json_store;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Whether a mutation is written to the data file right away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Persist {
    #[default]
    Save,
    /// Keep the change in memory only; the caller is expected to `save` later.
    Skip,
}

/// The authoritative task collection, bound to one data file.
///
/// Every mutation rewrites the whole file unless asked not to. Lookups by id
/// ignore ASCII case.
#[derive(Debug)]
pub struct TaskService {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskService {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let tasks = json_store::load_tasks(&path)?;
        Ok(Self { path, tasks })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in collection (insertion) order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn save(&self) -> Result<(), AppError> {
        json_store::save_tasks(&self.path, &self.tasks)
    }

    pub fn create(&mut self, input: NewTask) -> Result<Task, AppError> {
        self.create_with(input, Persist::Save)
    }

    pub fn create_with(&mut self, input: NewTask, persist: Persist) -> Result<Task, AppError> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            status: TaskStatus::NotCompleted,
            priority: input.priority,
            category: input.category,
            deadline: input.deadline,
        };

        self.tasks.push(task.clone());
        if let Err(err) = self.persist(persist) {
            self.tasks.pop();
            return Err(err);
        }

        tracing::info!(id = %task.id, name = %task.name, "created task");
        Ok(task)
    }

    pub fn list_all(&self) -> Vec<Task> {
        sorted(self.tasks.iter())
    }

    /// Returns `Ok(None)` for an unknown id; fails only when `id` is blank.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Task>, AppError> {
        let id = checked_id(id)?;
        Ok(self.position(id).map(|index| self.tasks[index].clone()))
    }

    pub fn filter_by_category(&self, category: TaskCategory) -> Vec<Task> {
        self.filtered(|task| task.category == category)
    }

    pub fn filter_by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.filtered(|task| task.status == status)
    }

    pub fn filter_by_category_and_status(
        &self,
        category: TaskCategory,
        status: TaskStatus,
    ) -> Vec<Task> {
        self.filtered(|task| task.category == category && task.status == status)
    }

    /// Tasks whose name or description contains any query keyword as a whole
    /// word, ignoring case. A query without keywords matches nothing.
    pub fn find(&self, query: &str) -> Vec<Task> {
        let keywords = keywords(query);
        if keywords.is_empty() {
            return Vec::new();
        }

        sorted(self.tasks.iter().filter(|task| {
            contains_any_word(&task.name, &keywords)
                || contains_any_word(&task.description, &keywords)
        }))
    }

    pub fn update(&mut self, id: &str, update: &TaskUpdate) -> Result<Task, AppError> {
        self.update_with(id, update, Persist::Save)
    }

    pub fn update_with(
        &mut self,
        id: &str,
        update: &TaskUpdate,
        persist: Persist,
    ) -> Result<Task, AppError> {
        let id = checked_id(id)?;
        let index = self
            .position(id)
            .ok_or_else(|| AppError::not_found(id))?;

        let mut updated = self.tasks[index].clone();
        update.apply_to(&mut updated);
        let previous = std::mem::replace(&mut self.tasks[index], updated.clone());

        if let Err(err) = self.persist(persist) {
            self.tasks[index] = previous;
            return Err(err);
        }

        tracing::info!(id = %updated.id, "updated task");
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<Task, AppError> {
        self.delete_with(id, Persist::Save)
    }

    pub fn delete_with(&mut self, id: &str, persist: Persist) -> Result<Task, AppError> {
        let id = checked_id(id)?;
        let index = self
            .position(id)
            .ok_or_else(|| AppError::not_found(id))?;

        let removed = self.tasks.remove(index);
        if let Err(err) = self.persist(persist) {
            self.tasks.insert(index, removed);
            return Err(err);
        }

        tracing::info!(id = %removed.id, "deleted task");
        Ok(removed)
    }

    fn persist(&self, persist: Persist) -> Result<(), AppError> {
        match persist {
            Persist::Save => self.save(),
            Persist::Skip => Ok(()),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks
            .iter()
            .position(|task| task.id.eq_ignore_ascii_case(id))
    }

    fn filtered(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| predicate(*task))
            .cloned()
            .collect()
    }
}

/// Priority, then status, deadline, category and finally name.
pub fn canonical_order(a: &Task, b: &Task) -> Ordering {
    a.priority
        .rank()
        .cmp(&b.priority.rank())
        .then_with(|| a.status.rank().cmp(&b.status.rank()))
        .then_with(|| a.deadline.cmp(&b.deadline))
        .then_with(|| a.category.rank().cmp(&b.category.rank()))
        .then_with(|| a.name.cmp(&b.name))
}

fn sorted<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<Task> {
    let mut tasks: Vec<Task> = tasks.cloned().collect();
    tasks.sort_by(canonical_order);
    tasks
}

fn checked_id(id: &str) -> Result<&str, AppError> {
    if id.trim().is_empty() {
        tracing::warn!("rejected blank task id");
        return Err(AppError::invalid_field("id", "must not be blank"));
    }
    Ok(id)
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Lowercased search keywords: punctuation removed, split on whitespace.
fn keywords(query: &str) -> Vec<String> {
    let cleaned: String = query
        .chars()
        .filter(|ch| is_word_char(*ch) || ch.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

fn contains_any_word(text: &str, keywords: &[String]) -> bool {
    text.split(|ch: char| !is_word_char(ch))
        .filter(|word| !word.is_empty())
        .any(|word| {
            let word = word.to_lowercase();
            keywords.iter().any(|keyword| *keyword == word)
        })
}
