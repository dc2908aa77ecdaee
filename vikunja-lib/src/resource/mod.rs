//! Thin wrappers mapping Vikunja resources onto [`Client`](crate::Client)
//! requests.
//!
//! The wrappers only choose paths and payload types; quota, errors and
//! parsing are handled by the client. Fields not modelled here are kept in
//! each type's `extra` map and round-trip unchanged.

mod project;
mod task;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use project::{NewProject, Project, ProjectResource, ProjectUpdate};
pub use task::{NewTask, Task, TaskResource, TaskUpdate};

/// A Vikunja user as embedded in other resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Numeric user id
    #[serde(default)]
    pub id: u64,
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Email address, only visible to some callers
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

/// A label attached to a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Numeric label id
    #[serde(default)]
    pub id: u64,
    /// Label title
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hex_color: String,
    /// Every field not listed above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload wrapper used by some endpoints: `{"data": ...}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}
