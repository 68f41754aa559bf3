use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::client::HubClient;
use crate::error::Result;
use crate::models::chat::ChatMessage;
use crate::models::entity::{
    require_attached, Attach, Entity, EntityKind, EntityRef, Materialize,
};

/// Model/agent configuration registered on the Hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) client: Option<HubClient>,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_languages")]
    pub supported_languages: Vec<String>,
    /// Extra headers sent to the model endpoint. The server may return these
    /// either as a map or as a list of `{name, value}` pairs.
    #[serde(default, deserialize_with = "headers_from_wire")]
    pub headers: BTreeMap<String, String>,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireHeaders {
    Pairs(Vec<HeaderPair>),
    Map(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct HeaderPair {
    pub name: String,
    pub value: String,
}

fn headers_from_wire<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error> {
    match WireHeaders::deserialize(deserializer) {
        Ok(WireHeaders::Map(map)) => Ok(map),
        Ok(WireHeaders::Pairs(pairs)) => Ok(pairs
            .into_iter()
            .map(|pair| (pair.name, pair.value))
            .collect()),
        Err(_) => Err(serde::de::Error::custom("invalid model headers")),
    }
}

/// Request payloads use the list-of-pairs form for headers.
pub(crate) fn headers_to_pairs(headers: &BTreeMap<String, String>) -> Vec<HeaderPair> {
    headers
        .iter()
        .map(|(name, value)| HeaderPair {
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}

impl Model {
    /// Send messages to the model and get its answer. Requires an attached
    /// client and a saved id.
    pub fn chat(&self, messages: &[ChatMessage]) -> Result<ModelOutput> {
        let (client, id) = require_attached(Self::KIND, &self.client, &self.id)?;
        client.models().chat(&id, messages)
    }
}

impl Entity for Model {
    fn entity_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn kind_name(&self) -> &'static str {
        Self::KIND
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl EntityKind for Model {
    const KIND: &'static str = "model";
}

impl Materialize for Model {
    const WIRE_NAME: &'static str = "model";
}

impl Attach for Model {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
    }
}

impl<'a> From<&'a Model> for EntityRef<'a> {
    fn from(model: &'a Model) -> Self {
        EntityRef::Object(model)
    }
}

// ---------------------------------------------------------------------------
// Model output
// ---------------------------------------------------------------------------

/// Error reported by a model while answering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
    pub message: String,
    #[serde(default)]
    pub details: Map<String, Value>,
}

/// Answer from a model. The message arrives under either the `response` or
/// the `message` key depending on the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawModelOutput")]
pub struct ModelOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
}

#[derive(Deserialize)]
struct RawModelOutput {
    #[serde(default)]
    response: Option<ChatMessage>,
    #[serde(default)]
    message: Option<ChatMessage>,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    error: Option<ExecutionError>,
}

impl From<RawModelOutput> for ModelOutput {
    fn from(raw: RawModelOutput) -> Self {
        ModelOutput {
            message: raw.response.or(raw.message),
            metadata: raw.metadata,
            error: raw.error,
        }
    }
}

impl Materialize for ModelOutput {
    const WIRE_NAME: &'static str = "model output";
}

impl ModelOutput {
    pub fn from_text(content: impl Into<String>) -> Self {
        ModelOutput {
            message: Some(ChatMessage::assistant(content)),
            metadata: Map::new(),
            error: None,
        }
    }
}
