use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote store. Never minted locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self { Self(value.to_string()) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Copy of this task with `done` flipped, as sent by a toggle.
    pub fn toggled(&self) -> Self { Self { done: !self.done, ..self.clone() } }
}

/// Body of a create request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
}

/// Partial update carrying only the editable text fields; `done` is left to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_store_shape_with_underscore_id() {
        let task: Task = serde_json::from_value(json!({ "_id": "abc", "title": "T", "description": "D", "done": true })).unwrap();
        assert_eq!(task.id, TaskId::from("abc"));
        assert!(task.done);
        assert_eq!(serde_json::to_value(&task).unwrap()["_id"], "abc");
    }

    #[test]
    fn missing_description_and_done_default() {
        let task: Task = serde_json::from_value(json!({ "_id": "1", "title": "T" })).unwrap();
        assert_eq!(task.description, "");
        assert!(!task.done);
    }

    #[test]
    fn edit_body_has_no_done_field() {
        let body = serde_json::to_value(TaskEdit { title: "a".into(), description: "b".into() }).unwrap();
        assert_eq!(body, json!({ "title": "a", "description": "b" }));
    }
}
