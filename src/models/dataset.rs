use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::HubClient;
use crate::error::Result;
use crate::models::entity::{
    require_attached, Attach, Entity, EntityKind, EntityRef, Materialize,
};
use crate::models::test_case::ChatTestCase;
use crate::resources::chat_test_cases::ChatTestCaseBody;

/// Dataset: a named collection of chat test cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
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
    pub description: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Dataset {
    /// Chat test cases belonging to this dataset. Requires an attached client
    /// and a saved id.
    pub fn test_cases(&self) -> Result<Vec<ChatTestCase>> {
        let (client, id) = require_attached(Self::KIND, &self.client, &self.id)?;
        client.chat_test_cases().list(&id)
    }

    /// Create a chat test case inside this dataset.
    pub fn create_test_case(&self, body: ChatTestCaseBody) -> Result<ChatTestCase> {
        let (client, id) = require_attached(Self::KIND, &self.client, &self.id)?;
        client.chat_test_cases().create(&id, body)
    }
}

impl Entity for Dataset {
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

impl EntityKind for Dataset {
    const KIND: &'static str = "dataset";
}

impl Materialize for Dataset {
    const WIRE_NAME: &'static str = "dataset";
}

impl Attach for Dataset {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
    }
}

impl<'a> From<&'a Dataset> for EntityRef<'a> {
    fn from(dataset: &'a Dataset) -> Self {
        EntityRef::Object(dataset)
    }
}
