use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Label, User};
use crate::{Client, DomainError, Result};

/// A task as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Numeric task id
    #[serde(default)]
    pub id: u64,
    /// Task title
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub project_id: u64,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub percent_done: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assignees: Option<Vec<User>>,
    #[serde(default)]
    pub labels: Option<Vec<Label>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Every field not listed above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// The API occasionally answers with zeroed records; reject those
    fn validated(self) -> Result<Self> {
        let stamped = |time: Option<&str>| time.is_some_and(|t| !t.is_empty());
        let complete = self.id != 0
            && !self.title.is_empty()
            && stamped(self.created.as_deref())
            && stamped(self.updated.as_deref());
        if !complete {
            return Err(DomainError::invalid_response(
                "Invalid task data: missing required fields",
            ));
        }
        Ok(self)
    }
}

/// Payload for creating a task
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl NewTask {
    /// A task with just a title
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Payload for updating a task; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_done: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// The `/tasks` endpoints
#[derive(Debug, Clone, Copy)]
pub struct TaskResource<'a> {
    client: &'a Client,
}

impl<'a> TaskResource<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// All tasks across projects
    ///
    /// # Errors
    ///
    /// Propagates any [`DomainError`] of the request, and fails with
    /// `InvalidResponse` if a task lacks its id, title or timestamps.
    pub async fn list(&self) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = self.client.get("/tasks/all").await?;
        tasks.into_iter().map(Task::validated).collect()
    }

    /// A single task
    ///
    /// # Errors
    ///
    /// See [`TaskResource::list`].
    pub async fn get(&self, id: u64) -> Result<Task> {
        self.client
            .get::<Task>(&format!("/tasks/{id}"))
            .await?
            .validated()
    }

    /// Create a task inside a project
    ///
    /// # Errors
    ///
    /// See [`TaskResource::list`].
    pub async fn create(&self, project_id: u64, task: &NewTask) -> Result<Task> {
        self.client
            .put::<Task, _>(&format!("/projects/{project_id}/tasks"), task)
            .await?
            .validated()
    }

    /// Update a task
    ///
    /// # Errors
    ///
    /// See [`TaskResource::list`].
    pub async fn update(&self, id: u64, update: &TaskUpdate) -> Result<Task> {
        self.client
            .post::<Task, _>(&format!("/tasks/{id}"), update)
            .await?
            .validated()
    }

    /// Delete a task
    ///
    /// # Errors
    ///
    /// Propagates any [`DomainError`] of the request.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client.delete(&format!("/tasks/{id}")).await
    }
}
