use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::HubClient;
use crate::error::Result;
use crate::maybe::Maybe;
use crate::models::dataset::Dataset;

const BASE_URL: &str = "/v2/datasets";

/// Unwraps the `{ "data": ... }` envelope used by the v2 endpoints.
#[derive(Deserialize)]
pub(crate) struct DataWrapper {
    pub data: serde_json::Value,
}

pub(crate) fn unwrap_data(value: serde_json::Value) -> Result<serde_json::Value> {
    let wrapper: DataWrapper = serde_json::from_value(value)?;
    Ok(wrapper.data)
}

/// Partial update for a dataset; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetUpdate {
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub name: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub description: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub project_id: Maybe<String>,
}

/// Parameters for adversarial dataset generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateAdversarialParams {
    pub model_id: String,
    pub dataset_name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<serde_json::Value>>,
    pub n_examples_per_category: u32,
}

/// Parameters for document-based dataset generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateDocumentBasedParams {
    pub model_id: String,
    pub knowledge_base_id: String,
    pub dataset_name: String,
    pub description: String,
    pub n_examples: u32,
    pub topic_ids: Vec<String>,
}

pub struct DatasetsResource<'a> {
    client: &'a HubClient,
}

impl<'a> DatasetsResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    pub fn list(&self, project_id: &str) -> Result<Vec<Dataset>> {
        let query = vec![("project_id".to_string(), project_id.to_string())];
        let body = self.client.transport().get(BASE_URL, &query)?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize_vec(unwrap_data(body)?)
    }

    pub fn retrieve(&self, dataset_id: &str) -> Result<Dataset> {
        let path = format!("{BASE_URL}/{dataset_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(unwrap_data(body)?)
    }

    pub fn create(&self, name: &str, description: &str, project_id: &str) -> Result<Dataset> {
        let payload = json!({
            "name": name,
            "description": description,
            "project_id": project_id,
        });
        let body = self
            .client
            .transport()
            .post(BASE_URL, Some(&payload), &[])?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize(unwrap_data(body)?)
    }

    pub fn update(&self, dataset_id: &str, update: &DatasetUpdate) -> Result<Dataset> {
        let path = format!("{BASE_URL}/{dataset_id}");
        let payload = serde_json::to_value(update)?;
        let body = self.client.transport().patch(&path, &payload)?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(unwrap_data(body)?)
    }

    pub fn delete(&self, dataset_ids: &[&str]) -> Result<()> {
        if let [single] = dataset_ids {
            let path = format!("{BASE_URL}/{single}");
            self.client.transport().delete(&path, &[])?;
            return Ok(());
        }
        let query: Vec<(String, String)> = dataset_ids
            .iter()
            .map(|id| ("datasets_ids".to_string(), id.to_string()))
            .collect();
        self.client.transport().delete(BASE_URL, &query)?;
        Ok(())
    }

    /// Generate an adversarial dataset against a model. The dataset is built
    /// asynchronously on the server.
    pub fn generate_adversarial(&self, params: &GenerateAdversarialParams) -> Result<Dataset> {
        let mut payload = serde_json::to_value(params)?;
        let project_id = self.project_id_of(&params.model_id)?;
        payload["project_id"] = serde_json::Value::String(project_id);

        let path = format!("{BASE_URL}/adversarial-generations");
        let body = self.client.transport().post(&path, Some(&payload), &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(unwrap_data(body)?)
    }

    /// Generate a dataset from a knowledge base.
    pub fn generate_document_based(
        &self,
        params: &GenerateDocumentBasedParams,
    ) -> Result<Dataset> {
        let mut payload = serde_json::to_value(params)?;
        let project_id = self.project_id_of(&params.model_id)?;
        payload["project_id"] = serde_json::Value::String(project_id);

        let path = format!("{BASE_URL}/document-based-generations");
        let body = self.client.transport().post(&path, Some(&payload), &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(unwrap_data(body)?)
    }

    /// Generation endpoints need the owning project, which only the model
    /// knows.
    fn project_id_of(&self, model_id: &str) -> Result<String> {
        let path = format!("/v2/models/{model_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        let model = unwrap_data(body)?;
        match model.get("project_id").and_then(serde_json::Value::as_str) {
            Some(project_id) => Ok(project_id.to_string()),
            None => Err(crate::error::HubApiError::Materialize {
                kind: "model",
                message: format!("model {model_id} has no project_id"),
            }),
        }
    }
}
