use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use super::task::{NewTask, Task, TaskEdit, TaskId};

/// Which remote call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation { List, Create, Toggle, Edit, Delete }

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Toggle => "toggle",
            Operation::Edit => "edit",
            Operation::Delete => "delete",
        })
    }
}

/// Transport errors, non-2xx statuses and malformed bodies all collapse here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{operation} request failed: {reason}")]
    RequestFailed { operation: Operation, reason: String },
}

impl StoreError {
    pub fn request_failed(operation: Operation, reason: impl fmt::Display) -> Self {
        Self::RequestFailed { operation, reason: reason.to_string() }
    }

    pub fn operation(&self) -> Operation {
        match self { Self::RequestFailed { operation, .. } => *operation }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The remote store of record.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    async fn list(&self) -> StoreResult<Vec<Task>>;
    async fn create(&self, input: NewTask) -> StoreResult<Task>;
    /// Full-object update; returns the store's representation.
    async fn replace(&self, task: Task) -> StoreResult<Task>;
    /// Partial update; the response body is not used.
    async fn edit(&self, id: TaskId, edit: TaskEdit) -> StoreResult<()>;
    async fn delete(&self, id: TaskId) -> StoreResult<()>;
}
