use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::HubClient;
use crate::error::Result;
use crate::maybe::Maybe;
use crate::models::evaluation::{
    EvaluationEntry, EvaluationRun, EvaluatorResult, ScheduledEvaluationRun,
};
use crate::models::model::ModelOutput;

const BASE_URL: &str = "/evaluations";

/// Parameters for launching an evaluation run.
#[derive(Debug, Clone)]
pub struct CreateEvaluationParams {
    pub model_id: String,
    pub dataset_id: String,
    pub tags: Option<Vec<String>>,
    pub name: Option<String>,
    pub run_count: u32,
}

/// Patch submitted for a single evaluation entry, used to report locally
/// computed outputs and verdicts back to the Hub.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationEntryUpdate {
    #[serde(
        rename = "output",
        skip_serializing_if = "Maybe::is_not_given",
        serialize_with = "output_payload"
    )]
    pub model_output: Maybe<ModelOutput>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub results: Maybe<Vec<EvaluatorResult>>,
}

fn output_payload<S: serde::Serializer>(
    output: &Maybe<ModelOutput>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match output {
        // The submit endpoint expects the answer under `response`.
        Maybe::Value(out) => {
            let mut payload = serde_json::Map::new();
            if let Some(message) = &out.message {
                payload.insert(
                    "response".to_string(),
                    serde_json::to_value(message).map_err(serde::ser::Error::custom)?,
                );
            }
            payload.insert(
                "metadata".to_string(),
                serde_json::Value::Object(out.metadata.clone()),
            );
            payload.serialize(serializer)
        }
        _ => output.serialize(serializer),
    }
}

#[derive(Deserialize)]
struct ItemsWrapper {
    items: Vec<serde_json::Value>,
}

pub struct EvaluationsResource<'a> {
    client: &'a HubClient,
}

impl<'a> EvaluationsResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    pub fn retrieve(&self, run_id: &str) -> Result<EvaluationRun> {
        let path = format!("{BASE_URL}/{run_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    /// Retrieve a run launched by a scheduled evaluation. Same endpoint as
    /// [`retrieve`](Self::retrieve) but with the schedule-specific fields.
    pub fn retrieve_scheduled(&self, run_id: &str) -> Result<ScheduledEvaluationRun> {
        let path = format!("{BASE_URL}/{run_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn create(&self, params: CreateEvaluationParams) -> Result<EvaluationRun> {
        let mut payload = json!({
            "model_id": params.model_id,
            "run_count": params.run_count,
        });
        if let Some(name) = params.name {
            payload["name"] = json!(name);
        }
        let mut criterion = json!({ "dataset_id": params.dataset_id });
        if let Some(tags) = params.tags {
            criterion["tags"] = json!(tags);
        }
        payload["criteria"] = json!([criterion]);

        let body = self
            .client
            .transport()
            .post(BASE_URL, Some(&payload), &[])?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize(body)
    }

    pub fn list(&self, project_id: &str) -> Result<Vec<EvaluationRun>> {
        let query = vec![("project_id".to_string(), project_id.to_string())];
        let body = self.client.transport().get(BASE_URL, &query)?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize_vec(body)
    }

    pub fn delete(&self, run_ids: &[&str]) -> Result<()> {
        let query: Vec<(String, String)> = run_ids
            .iter()
            .map(|id| ("evaluation_ids".to_string(), id.to_string()))
            .collect();
        self.client.transport().delete(BASE_URL, &query)?;
        Ok(())
    }

    /// All entries of a run. The endpoint pages its results; a single large
    /// page is requested so callers get the whole run at once.
    pub fn list_entries(&self, run_id: &str) -> Result<Vec<EvaluationEntry>> {
        let path = format!("{BASE_URL}/{run_id}/results");
        let query = vec![("limit".to_string(), "100000".to_string())];
        let body = self.client.transport().get(&path, &query)?;
        let body = self.client.expect_body(&path, body)?;
        let wrapper: ItemsWrapper = serde_json::from_value(body)?;
        self.client
            .materialize_vec(serde_json::Value::Array(wrapper.items))
    }

    /// Submit locally computed output or verdicts for one entry.
    pub fn update_entry(
        &self,
        run_id: &str,
        entry_id: &str,
        update: &EvaluationEntryUpdate,
    ) -> Result<EvaluationEntry> {
        let path = format!("{BASE_URL}/{run_id}/results/{entry_id}/submit-local");
        let payload = serde_json::to_value(update)?;
        let body = self.client.transport().patch(&path, &payload)?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }
}
