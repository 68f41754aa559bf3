use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::HubClient;
use crate::models::chat::ChatMessage;
use crate::models::check::CheckConfig;
use crate::models::entity::{Attach, Entity, EntityKind, EntityRef, Materialize};

/// A dataset entry in the deprecated conversation shape.
///
/// Kept so payloads produced by older Hub versions still materialize; new
/// code should use [`ChatTestCase`](crate::models::test_case::ChatTestCase).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_output: Option<ChatMessage>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

impl Entity for Conversation {
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

impl EntityKind for Conversation {
    const KIND: &'static str = "conversation";
}

impl Materialize for Conversation {
    const WIRE_NAME: &'static str = "conversation";
}

impl Attach for Conversation {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
    }
}

impl<'a> From<&'a Conversation> for EntityRef<'a> {
    fn from(conversation: &'a Conversation) -> Self {
        EntityRef::Object(conversation)
    }
}
