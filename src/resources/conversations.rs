use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::HubClient;
use crate::error::Result;
use crate::maybe::Maybe;
use crate::models::chat::ChatMessage;
use crate::models::check::{checks_to_backend, CheckConfig};
use crate::models::conversation::Conversation;

const BASE_URL: &str = "/conversations";

#[derive(Deserialize)]
struct ItemsWrapper {
    items: Vec<serde_json::Value>,
}

/// Fields for a new conversation entry.
#[derive(Debug, Clone, Default)]
pub struct ConversationBody {
    pub messages: Vec<ChatMessage>,
    pub demo_output: Option<ChatMessage>,
    pub tags: Vec<String>,
    pub checks: Vec<CheckConfig>,
}

/// Partial update for a conversation; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationUpdate {
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub dataset_id: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub messages: Maybe<Vec<ChatMessage>>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub demo_output: Maybe<ChatMessage>,
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

pub struct ConversationsResource<'a> {
    client: &'a HubClient,
}

impl<'a> ConversationsResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    /// Conversations of a dataset. The endpoint pages its results; a single
    /// large page is requested so callers get the whole dataset at once.
    pub fn list(&self, dataset_id: &str) -> Result<Vec<Conversation>> {
        let path = format!("/datasets/{dataset_id}/conversations");
        let query = vec![("limit".to_string(), "100000".to_string())];
        let body = self.client.transport().get(&path, &query)?;
        let body = self.client.expect_body(&path, body)?;
        let wrapper: ItemsWrapper = serde_json::from_value(body)?;
        self.client
            .materialize_vec(serde_json::Value::Array(wrapper.items))
    }

    pub fn retrieve(&self, conversation_id: &str) -> Result<Conversation> {
        let path = format!("{BASE_URL}/{conversation_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn create(&self, dataset_id: &str, body: ConversationBody) -> Result<Conversation> {
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
        self.client.materialize(response)
    }

    pub fn update(
        &self,
        conversation_id: &str,
        update: &ConversationUpdate,
    ) -> Result<Conversation> {
        let path = format!("{BASE_URL}/{conversation_id}");
        let payload = serde_json::to_value(update)?;
        let body = self.client.transport().patch(&path, &payload)?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn delete(&self, conversation_ids: &[&str]) -> Result<()> {
        let query: Vec<(String, String)> = conversation_ids
            .iter()
            .map(|id| ("conversation_ids".to_string(), id.to_string()))
            .collect();
        self.client.transport().delete(BASE_URL, &query)?;
        Ok(())
    }
}
