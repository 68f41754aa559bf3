use serde::Serialize;
use serde_json::json;

use crate::client::HubClient;
use crate::error::Result;
use crate::maybe::Maybe;
use crate::models::project::Project;

/// Partial update for a project; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub name: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub description: Maybe<String>,
}

pub struct ProjectsResource<'a> {
    client: &'a HubClient,
}

impl<'a> ProjectsResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Project>> {
        let body = self.client.transport().get("/projects", &[])?;
        let body = self.client.expect_body("/projects", body)?;
        self.client.materialize_vec(body)
    }

    pub fn retrieve(&self, project_id: &str) -> Result<Project> {
        let path = format!("/projects/{project_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn create(&self, name: &str, description: &str) -> Result<Project> {
        let payload = json!({ "name": name, "description": description });
        let body = self
            .client
            .transport()
            .post("/projects", Some(&payload), &[])?;
        let body = self.client.expect_body("/projects", body)?;
        self.client.materialize(body)
    }

    pub fn update(&self, project_id: &str, update: &ProjectUpdate) -> Result<Project> {
        let path = format!("/projects/{project_id}");
        let payload = serde_json::to_value(update)?;
        let body = self.client.transport().patch(&path, &payload)?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn delete(&self, project_ids: &[&str]) -> Result<()> {
        let query: Vec<(String, String)> = project_ids
            .iter()
            .map(|id| ("project_ids".to_string(), id.to_string()))
            .collect();
        self.client.transport().delete("/projects", &query)?;
        Ok(())
    }
}
