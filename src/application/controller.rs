use std::{future::Future, sync::Arc};

use tokio::sync::mpsc;

use super::task_list::{Completion, TaskList, TaskListError};
use crate::domain::{
    store::{Operation, StoreError, TaskStore},
    task::{NewTask, TaskId},
};

/// Owns the task list and routes every mutation through the remote store.
///
/// Remote intents return as soon as the request is dispatched. Each request
/// runs on its own tokio task and reports back through a channel; completions
/// are applied here, one at a time, in the order they arrive.
pub struct TaskListController<S: TaskStore> {
    store: Arc<S>,
    state: TaskList,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<S: TaskStore> TaskListController<S> {
    pub fn new(store: S) -> Self { Self::with_shared_store(Arc::new(store)) }

    pub fn with_shared_store(store: Arc<S>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self { store, state: TaskList::new(), completions_tx, completions_rx, in_flight: 0 }
    }

    pub fn state(&self) -> &TaskList { &self.state }

    /// Requests dispatched but not yet applied.
    pub fn in_flight(&self) -> usize { self.in_flight }

    /// Runs `request` on its own task. If that task dies without a result,
    /// `on_abort` turns the failure into the completion that is delivered instead.
    fn dispatch<F, A>(&mut self, operation: Operation, request: F, on_abort: A)
    where
        F: Future<Output = Completion> + Send + 'static,
        A: FnOnce(StoreError) -> Completion + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.completions_tx.clone();
        let handle = tokio::spawn(request);
        tokio::spawn(async move {
            let completion = match handle.await {
                Ok(completion) => completion,
                Err(err) => on_abort(StoreError::request_failed(operation, err)),
            };
            let _ = tx.send(completion);
        });
    }

    pub fn load(&mut self) {
        self.state.begin_load();
        let store = Arc::clone(&self.store);
        self.dispatch(
            Operation::List,
            async move { Completion::Loaded(store.list().await) },
            |err| Completion::Loaded(Err(err)),
        );
    }

    pub fn set_pending_title(&mut self, text: impl Into<String>) { self.state.set_pending_title(text); }

    /// Sends the pending title as a new task and clears the input buffer.
    pub fn add_task(&mut self) {
        let input = NewTask { title: self.state.take_pending_title(), description: String::new() };
        let store = Arc::clone(&self.store);
        self.dispatch(
            Operation::Create,
            async move { Completion::Created(store.create(input).await) },
            |err| Completion::Created(Err(err)),
        );
    }

    pub fn toggle_done(&mut self, id: &TaskId) -> Result<(), TaskListError> {
        let task = self.state.get(id).ok_or_else(|| TaskListError::UnknownTask(id.clone()))?.toggled();
        let (id, aborted_id) = (id.clone(), id.clone());
        let store = Arc::clone(&self.store);
        self.dispatch(
            Operation::Toggle,
            async move { Completion::Toggled { id, outcome: store.replace(task).await } },
            move |err| Completion::Toggled { id: aborted_id, outcome: Err(err) },
        );
        Ok(())
    }

    pub fn start_edit(&mut self, id: TaskId, title: impl Into<String>, description: impl Into<String>) {
        self.state.start_edit(id, title, description);
    }

    pub fn update_draft_title(&mut self, text: impl Into<String>) { self.state.update_draft_title(text); }

    pub fn update_draft_description(&mut self, text: impl Into<String>) { self.state.update_draft_description(text); }

    /// Sends the current draft for `id`. The session stays open until the store accepts it.
    pub fn save_edit(&mut self, id: &TaskId) -> Result<(), TaskListError> {
        let edit = self.state.edit_session().ok_or(TaskListError::NoActiveEdit)?.draft();
        let (id, aborted_id) = (id.clone(), id.clone());
        let aborted_edit = edit.clone();
        let store = Arc::clone(&self.store);
        self.dispatch(
            Operation::Edit,
            async move {
                let outcome = store.edit(id.clone(), edit.clone()).await;
                Completion::Edited { id, edit, outcome }
            },
            move |err| Completion::Edited { id: aborted_id, edit: aborted_edit, outcome: Err(err) },
        );
        Ok(())
    }

    pub fn cancel_edit(&mut self) { self.state.cancel_edit(); }

    pub fn delete_task(&mut self, id: &TaskId) {
        let (id, aborted_id) = (id.clone(), id.clone());
        let store = Arc::clone(&self.store);
        self.dispatch(
            Operation::Delete,
            async move {
                let outcome = store.delete(id.clone()).await;
                Completion::Deleted { id, outcome }
            },
            move |err| Completion::Deleted { id: aborted_id, outcome: Err(err) },
        );
    }

    /// Applies every completion already delivered without waiting. Returns how many were applied.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.complete(completion);
            applied += 1;
        }
        applied
    }

    /// Waits for the next completion and applies it. Returns false when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 { return false; }
        match self.completions_rx.recv().await {
            Some(completion) => { self.complete(completion); true }
            None => false,
        }
    }

    pub async fn settle(&mut self) { while self.next_completion().await {} }

    fn complete(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state.apply(completion);
    }
}
