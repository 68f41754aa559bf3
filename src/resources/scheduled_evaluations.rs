use serde::Serialize;

use crate::client::HubClient;
use crate::error::Result;
use crate::maybe::Maybe;
use crate::models::schedule::{FrequencyOption, ScheduledEvaluation};

const BASE_URL: &str = "/scheduled-evaluations";

/// Parameters for creating a scheduled evaluation.
///
/// `day_of_week` (1-7, Monday is 1) is required for weekly schedules and
/// `day_of_month` (1-28) for monthly ones; the server rejects mismatches.
#[derive(Debug, Clone, Serialize)]
pub struct CreateScheduledEvaluationParams {
    pub project_id: String,
    pub name: String,
    pub model_id: String,
    pub dataset_id: String,
    pub frequency: FrequencyOption,
    /// Time of day in `HH:MM`.
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub run_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
}

/// Partial update for a scheduled evaluation; unset fields are left
/// untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScheduledEvaluationUpdate {
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub name: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub model_id: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub dataset_id: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub frequency: Maybe<FrequencyOption>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub time: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub tags: Maybe<Vec<String>>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub run_count: Maybe<u32>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub day_of_week: Maybe<u8>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub day_of_month: Maybe<u8>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub paused: Maybe<bool>,
}

pub struct ScheduledEvaluationsResource<'a> {
    client: &'a HubClient,
}

impl<'a> ScheduledEvaluationsResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    pub fn list(&self, project_id: &str) -> Result<Vec<ScheduledEvaluation>> {
        let query = vec![("project_id".to_string(), project_id.to_string())];
        let body = self.client.transport().get(BASE_URL, &query)?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize_vec(body)
    }

    pub fn retrieve(&self, scheduled_evaluation_id: &str) -> Result<ScheduledEvaluation> {
        let path = format!("{BASE_URL}/{scheduled_evaluation_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn create(
        &self,
        params: &CreateScheduledEvaluationParams,
    ) -> Result<ScheduledEvaluation> {
        let payload = serde_json::to_value(params)?;
        let body = self
            .client
            .transport()
            .post(BASE_URL, Some(&payload), &[])?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize(body)
    }

    pub fn update(
        &self,
        scheduled_evaluation_id: &str,
        update: &ScheduledEvaluationUpdate,
    ) -> Result<ScheduledEvaluation> {
        let path = format!("{BASE_URL}/{scheduled_evaluation_id}");
        let payload = serde_json::to_value(update)?;
        let body = self.client.transport().patch(&path, &payload)?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn delete(&self, scheduled_evaluation_ids: &[&str]) -> Result<()> {
        let query: Vec<(String, String)> = scheduled_evaluation_ids
            .iter()
            .map(|id| ("scheduled_evaluation_ids".to_string(), id.to_string()))
            .collect();
        self.client.transport().delete(BASE_URL, &query)?;
        Ok(())
    }
}
