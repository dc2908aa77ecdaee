use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Envelope, User};
use crate::{Client, Result};

/// A project as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Numeric project id
    pub id: u64,
    /// Project title
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hex_color: String,
    #[serde(default)]
    pub identifier: String,
    /// Parent project, `0` for top-level projects
    #[serde(default)]
    pub parent_project_id: u64,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Every field not listed above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for creating a project
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewProject {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_project_id: Option<u64>,
}

impl NewProject {
    /// A project with just a title
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Payload for updating a project; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

/// The `/projects` endpoints. Responses arrive as `{"data": ...}`.
#[derive(Debug, Clone, Copy)]
pub struct ProjectResource<'a> {
    client: &'a Client,
}

impl<'a> ProjectResource<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// All projects visible to the token
    ///
    /// # Errors
    ///
    /// Propagates any [`DomainError`](crate::DomainError) of the request.
    pub async fn list(&self) -> Result<Vec<Project>> {
        let envelope: Envelope<Vec<Project>> = self.client.get("/projects").await?;
        Ok(envelope.data)
    }

    /// A single project
    ///
    /// # Errors
    ///
    /// Propagates any [`DomainError`](crate::DomainError) of the request.
    pub async fn get(&self, id: u64) -> Result<Project> {
        let envelope: Envelope<Project> = self.client.get(&format!("/projects/{id}")).await?;
        Ok(envelope.data)
    }

    /// Create a project
    ///
    /// # Errors
    ///
    /// Propagates any [`DomainError`](crate::DomainError) of the request.
    pub async fn create(&self, project: &NewProject) -> Result<Project> {
        let envelope: Envelope<Project> = self.client.put("/projects", project).await?;
        Ok(envelope.data)
    }

    /// Update a project
    ///
    /// # Errors
    ///
    /// Propagates any [`DomainError`](crate::DomainError) of the request.
    pub async fn update(&self, id: u64, update: &ProjectUpdate) -> Result<Project> {
        let envelope: Envelope<Project> =
            self.client.post(&format!("/projects/{id}"), update).await?;
        Ok(envelope.data)
    }

    /// Delete a project
    ///
    /// # Errors
    ///
    /// Propagates any [`DomainError`](crate::DomainError) of the request.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client.delete(&format!("/projects/{id}")).await
    }
}
