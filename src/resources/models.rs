use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::client::HubClient;
use crate::error::Result;
use crate::maybe::Maybe;
use crate::models::chat::ChatMessage;
use crate::models::entity::Materialize;
use crate::models::model::{headers_to_pairs, Model, ModelOutput};

const BASE_URL: &str = "/models";

/// Parameters for registering a model on the Hub.
#[derive(Debug, Clone, Serialize)]
pub struct CreateModelParams {
    pub name: String,
    pub url: String,
    pub project_id: String,
    pub description: String,
    pub supported_languages: Vec<String>,
    #[serde(serialize_with = "pairs")]
    pub headers: BTreeMap<String, String>,
}

/// Partial update for a model; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelUpdate {
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub name: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub url: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub description: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub supported_languages: Maybe<Vec<String>>,
    #[serde(
        skip_serializing_if = "Maybe::is_not_given",
        serialize_with = "maybe_pairs"
    )]
    pub headers: Maybe<BTreeMap<String, String>>,
}

fn pairs<S: serde::Serializer>(
    headers: &BTreeMap<String, String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    headers_to_pairs(headers).serialize(serializer)
}

fn maybe_pairs<S: serde::Serializer>(
    headers: &Maybe<BTreeMap<String, String>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match headers {
        Maybe::Value(map) => headers_to_pairs(map).serialize(serializer),
        _ => headers.serialize(serializer),
    }
}

pub struct ModelsResource<'a> {
    client: &'a HubClient,
}

impl<'a> ModelsResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    pub fn list(&self, project_id: &str) -> Result<Vec<Model>> {
        let query = vec![("project_id".to_string(), project_id.to_string())];
        let body = self.client.transport().get(BASE_URL, &query)?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize_vec(body)
    }

    pub fn retrieve(&self, model_id: &str) -> Result<Model> {
        let path = format!("{BASE_URL}/{model_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn create(&self, params: &CreateModelParams) -> Result<Model> {
        let payload = serde_json::to_value(params)?;
        let body = self
            .client
            .transport()
            .post(BASE_URL, Some(&payload), &[])?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize(body)
    }

    pub fn update(&self, model_id: &str, update: &ModelUpdate) -> Result<Model> {
        let path = format!("{BASE_URL}/{model_id}");
        let payload = serde_json::to_value(update)?;
        let body = self.client.transport().patch(&path, &payload)?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn delete(&self, model_ids: &[&str]) -> Result<()> {
        let query: Vec<(String, String)> = model_ids
            .iter()
            .map(|id| ("model_ids".to_string(), id.to_string()))
            .collect();
        self.client.transport().delete(BASE_URL, &query)?;
        Ok(())
    }

    /// Run a chat completion against a registered model.
    pub fn chat(&self, model_id: &str, messages: &[ChatMessage]) -> Result<ModelOutput> {
        let path = format!("{BASE_URL}/{model_id}/chat");
        let payload = json!({ "messages": messages });
        let body = self.client.transport().post(&path, Some(&payload), &[])?;
        let body = self.client.expect_body(&path, body)?;
        ModelOutput::from_value(body)
    }
}
