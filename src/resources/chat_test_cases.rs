use serde::Serialize;
use serde_json::json;

use crate::client::HubClient;
use crate::error::Result;
use crate::maybe::Maybe;
use crate::models::chat::{ChatMessage, ChatMessageWithMetadata};
use crate::models::check::{checks_to_backend, CheckConfig};
use crate::models::test_case::ChatTestCase;
use crate::resources::datasets::unwrap_data;

const BASE_URL: &str = "/v2/test-cases";

/// Fields for a new chat test case.
#[derive(Debug, Clone, Default)]
pub struct ChatTestCaseBody {
    pub messages: Vec<ChatMessage>,
    pub demo_output: Option<ChatMessageWithMetadata>,
    pub tags: Vec<String>,
    pub checks: Vec<CheckConfig>,
}

/// Partial update for a chat test case; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatTestCaseUpdate {
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub dataset_id: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub messages: Maybe<Vec<ChatMessage>>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub demo_output: Maybe<ChatMessageWithMetadata>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub tags: Maybe<Vec<String>>,
    #[serde(
        skip_serializing_if = "Maybe::is_not_given",
        serialize_with = "maybe_checks"
    )]
    pub checks: Maybe<Vec<CheckConfig>>,
}

fn maybe_checks<S: serde::Serializer>(
    checks: &Maybe<Vec<CheckConfig>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match checks {
        Maybe::Value(configs) => checks_to_backend(configs).serialize(serializer),
        _ => checks.serialize(serializer),
    }
}

pub struct ChatTestCasesResource<'a> {
    client: &'a HubClient,
}

impl<'a> ChatTestCasesResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    pub fn list(&self, dataset_id: &str) -> Result<Vec<ChatTestCase>> {
        let path = format!("/v2/datasets/{dataset_id}/test-cases");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize_vec(unwrap_data(body)?)
    }

    pub fn retrieve(&self, test_case_id: &str) -> Result<ChatTestCase> {
        let path = format!("{BASE_URL}/{test_case_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(unwrap_data(body)?)
    }

    pub fn create(&self, dataset_id: &str, body: ChatTestCaseBody) -> Result<ChatTestCase> {
        let payload = json!({
            "dataset_id": dataset_id,
            "messages": body.messages,
            "demo_output": body.demo_output,
            "tags": body.tags,
            "checks": checks_to_backend(&body.checks),
        });
        let response = self
            .client
            .transport()
            .post(BASE_URL, Some(&payload), &[])?;
        let response = self.client.expect_body(BASE_URL, response)?;
        self.client.materialize(unwrap_data(response)?)
    }

    pub fn update(
        &self,
        test_case_id: &str,
        update: &ChatTestCaseUpdate,
    ) -> Result<ChatTestCase> {
        let path = format!("{BASE_URL}/{test_case_id}");
        let payload = serde_json::to_value(update)?;
        let body = self.client.transport().patch(&path, &payload)?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(unwrap_data(body)?)
    }

    pub fn delete(&self, test_case_ids: &[&str]) -> Result<()> {
        if let [single] = test_case_ids {
            let path = format!("{BASE_URL}/{single}");
            self.client.transport().delete(&path, &[])?;
            return Ok(());
        }
        let query: Vec<(String, String)> = test_case_ids
            .iter()
            .map(|id| ("test_case_ids".to_string(), id.to_string()))
            .collect();
        self.client.transport().delete(BASE_URL, &query)?;
        Ok(())
    }
}
