use thiserror::Error;

use crate::domain::{
    store::{StoreError, StoreResult},
    task::{Task, TaskEdit, TaskId},
};

/// Locally buffered inline edit of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub target: TaskId,
    pub draft_title: String,
    pub draft_description: String,
}

impl EditSession {
    pub fn draft(&self) -> TaskEdit {
        TaskEdit { title: self.draft_title.clone(), description: self.draft_description.clone() }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskListError {
    #[error("no task with id {0} in the list")]
    UnknownTask(TaskId),
    #[error("no edit in progress")]
    NoActiveEdit,
}

/// Outcome of one remote call, delivered back to the owner of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Loaded(StoreResult<Vec<Task>>),
    Created(StoreResult<Task>),
    Toggled { id: TaskId, outcome: StoreResult<Task> },
    /// `edit` holds the draft values that were sent.
    Edited { id: TaskId, edit: TaskEdit, outcome: StoreResult<()> },
    Deleted { id: TaskId, outcome: StoreResult<()> },
}

/// Client-side cache of the remote list plus the edit overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
    loading: bool,
    edit: Option<EditSession>,
    pending_title: String,
    last_error: Option<String>,
}

impl Default for TaskList {
    fn default() -> Self { Self::new() }
}

impl TaskList {
    /// Empty list that is waiting on its initial fetch.
    pub fn new() -> Self {
        Self { tasks: Vec::new(), loading: true, edit: None, pending_title: String::new(), last_error: None }
    }

    pub fn tasks(&self) -> &[Task] { &self.tasks }
    pub fn loading(&self) -> bool { self.loading }
    pub fn edit_session(&self) -> Option<&EditSession> { self.edit.as_ref() }
    pub fn pending_title(&self) -> &str { &self.pending_title }
    pub fn last_error(&self) -> Option<&str> { self.last_error.as_deref() }

    pub fn get(&self, id: &TaskId) -> Option<&Task> { self.tasks.iter().find(|t| &t.id == id) }

    pub fn is_editing(&self, id: &TaskId) -> bool { self.edit.as_ref().is_some_and(|s| &s.target == id) }

    pub fn begin_load(&mut self) { self.loading = true; }

    pub fn set_pending_title(&mut self, text: impl Into<String>) { self.pending_title = text.into(); }

    /// Hands out the pending title and clears the input buffer.
    pub fn take_pending_title(&mut self) -> String { std::mem::take(&mut self.pending_title) }

    /// Opens an edit on `id`, discarding any unsaved draft.
    pub fn start_edit(&mut self, id: TaskId, title: impl Into<String>, description: impl Into<String>) {
        if let Some(previous) = self.edit.as_ref().filter(|s| s.target != id) {
            tracing::debug!(discarded = %previous.target, "replacing unsaved edit");
        }
        self.edit = Some(EditSession { target: id, draft_title: title.into(), draft_description: description.into() });
    }

    pub fn update_draft_title(&mut self, text: impl Into<String>) {
        if let Some(session) = self.edit.as_mut() { session.draft_title = text.into(); }
    }

    pub fn update_draft_description(&mut self, text: impl Into<String>) {
        if let Some(session) = self.edit.as_mut() { session.draft_description = text.into(); }
    }

    pub fn cancel_edit(&mut self) { self.edit = None; }

    /// Reconciles local state with a finished remote call. Failures are logged and otherwise leave `tasks` alone.
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Loaded(outcome) => {
                self.loading = false;
                match outcome {
                    Ok(tasks) => {
                        tracing::debug!(count = tasks.len(), "task list loaded");
                        self.tasks = tasks;
                        self.last_error = None;
                    }
                    Err(err) => {
                        self.tasks.clear();
                        self.record_failure(&err, None);
                    }
                }
            }
            Completion::Created(Ok(task)) => {
                tracing::debug!(id = %task.id, "task created");
                self.tasks.push(task);
                self.last_error = None;
            }
            Completion::Created(Err(err)) => self.record_failure(&err, None),
            Completion::Toggled { id, outcome: Ok(task) } => {
                match self.tasks.iter_mut().find(|t| t.id == id) {
                    Some(slot) => *slot = task,
                    None => tracing::debug!(%id, "toggled task is no longer listed"),
                }
                self.last_error = None;
            }
            Completion::Toggled { id, outcome: Err(err) } => self.record_failure(&err, Some(&id)),
            Completion::Edited { id, edit, outcome: Ok(()) } => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                    task.title = edit.title;
                    task.description = edit.description;
                }
                self.edit = None;
                self.last_error = None;
            }
            Completion::Edited { id, outcome: Err(err), .. } => self.record_failure(&err, Some(&id)),
            Completion::Deleted { id, outcome: Ok(()) } => {
                self.tasks.retain(|t| t.id != id);
                if self.is_editing(&id) { self.edit = None; }
                self.last_error = None;
            }
            Completion::Deleted { id, outcome: Err(err) } => self.record_failure(&err, Some(&id)),
        }
    }

    fn record_failure(&mut self, err: &StoreError, id: Option<&TaskId>) {
        match id {
            Some(id) => tracing::warn!(operation = %err.operation(), %id, error = %err, "remote call failed"),
            None => tracing::warn!(operation = %err.operation(), error = %err, "remote call failed"),
        }
        self.last_error = Some(err.to_string());
    }
}
