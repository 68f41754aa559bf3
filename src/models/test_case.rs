use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::HubClient;
use crate::models::chat::{ChatMessage, ChatMessageWithMetadata};
use crate::models::check::CheckConfig;
use crate::models::entity::{Attach, Entity, EntityKind, EntityRef, Materialize};

/// A dataset entry representing a chat test case.
///
/// Checks arrive from the server in backend form and are normalized to
/// [`CheckConfig`] during materialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatTestCase {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) client: Option<HubClient>,

    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Output of the agent for demonstration purposes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_output: Option<ChatMessageWithMetadata>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

impl Entity for ChatTestCase {
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

impl EntityKind for ChatTestCase {
    const KIND: &'static str = "chat test case";
}

impl Materialize for ChatTestCase {
    const WIRE_NAME: &'static str = "chat test case";
}

impl Attach for ChatTestCase {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
    }
}

impl<'a> From<&'a ChatTestCase> for EntityRef<'a> {
    fn from(test_case: &'a ChatTestCase) -> Self {
        EntityRef::Object(test_case)
    }
}
