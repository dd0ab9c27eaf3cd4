use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};

use crate::config::Settings;
use crate::domain::{
    store::{Operation, StoreError, StoreResult, TaskStore},
    task::{NewTask, Task, TaskEdit, TaskId},
};

const COLLECTION_PATH: &str = "/api/todo";

/// `TaskStore` over the remote JSON API rooted at `{base_url}/api/todo`.
#[derive(Clone)]
pub struct HttpTaskStore {
    http: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct CreatedEnvelope {
    #[serde(rename = "newTodo")]
    new_todo: Task,
}

impl HttpTaskStore {
    pub fn new(base_url: impl Into<String>) -> Self { Self::with_client(Client::new(), base_url) }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout { builder = builder.timeout(timeout); }
        Ok(Self::with_client(builder.build()?, settings.api_url.clone()))
    }

    pub fn collection_url(&self) -> String { format!("{}{}", self.base_url, COLLECTION_PATH) }

    pub fn item_url(&self, id: &TaskId) -> String { format!("{}{}/{}", self.base_url, COLLECTION_PATH, id) }
}

async fn send(operation: Operation, request: RequestBuilder) -> StoreResult<Response> {
    let response = request
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| StoreError::request_failed(operation, e))?;
    response.error_for_status().map_err(|e| StoreError::request_failed(operation, e))
}

async fn read_json<T: DeserializeOwned>(operation: Operation, response: Response) -> StoreResult<T> {
    response.json::<T>().await.map_err(|e| StoreError::request_failed(operation, e))
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list(&self) -> StoreResult<Vec<Task>> {
        let url = self.collection_url();
        tracing::debug!(%url, "GET");
        let response = send(Operation::List, self.http.get(&url)).await?;
        read_json(Operation::List, response).await
    }

    async fn create(&self, input: NewTask) -> StoreResult<Task> {
        let url = self.collection_url();
        tracing::debug!(%url, title = %input.title, "POST");
        let response = send(Operation::Create, self.http.post(&url).json(&input)).await?;
        let envelope: CreatedEnvelope = read_json(Operation::Create, response).await?;
        Ok(envelope.new_todo)
    }

    async fn replace(&self, task: Task) -> StoreResult<Task> {
        let url = self.item_url(&task.id);
        tracing::debug!(%url, done = task.done, "PATCH");
        let response = send(Operation::Toggle, self.http.patch(&url).json(&task)).await?;
        read_json(Operation::Toggle, response).await
    }

    async fn edit(&self, id: TaskId, edit: TaskEdit) -> StoreResult<()> {
        let url = self.item_url(&id);
        tracing::debug!(%url, "PATCH");
        send(Operation::Edit, self.http.patch(&url).json(&edit)).await?;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        let url = self.item_url(&id);
        tracing::debug!(%url, "DELETE");
        send(Operation::Delete, self.http.delete(&url)).await?;
        Ok(())
    }
}
