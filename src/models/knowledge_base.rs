use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::HubClient;
use crate::error::Result;
use crate::models::entity::{
    require_attached, Attach, Entity, EntityKind, EntityRef, Materialize,
};
use crate::models::task::{TaskBacked, TaskProgress};

/// A topic within a knowledge base.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topic {
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
    pub knowledge_base_id: Option<String>,
}

impl Entity for Topic {
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

impl EntityKind for Topic {
    const KIND: &'static str = "topic";
}

impl Materialize for Topic {
    const WIRE_NAME: &'static str = "topic";
}

impl Attach for Topic {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
    }
}

/// A document within a knowledge base.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) client: Option<HubClient>,

    #[serde(default)]
    pub knowledge_base_id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub topic_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Entity for Document {
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

impl EntityKind for Document {
    const KIND: &'static str = "document";
}

impl Materialize for Document {
    const WIRE_NAME: &'static str = "document";
}

impl Attach for Document {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
    }
}

/// Knowledge base: a task-backed entity whose ingestion (chunking, topic
/// extraction, embedding) runs asynchronously after upload. `topics` and
/// `n_documents` are not trustworthy until the ingestion task finishes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) client: Option<HubClient>,

    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub n_documents: u64,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default, rename = "status")]
    pub progress: Option<TaskProgress>,
}

impl KnowledgeBase {
    /// Topics of this knowledge base, fetched from the Hub.
    pub fn list_topics(&self) -> Result<Vec<Topic>> {
        let (client, id) = require_attached(Self::KIND, &self.client, &self.id)?;
        client.knowledge_bases().list_topics(&id)
    }

    /// Documents of this knowledge base, fetched from the Hub.
    pub fn list_documents(&self, topic_id: Option<&str>) -> Result<Vec<Document>> {
        let (client, id) = require_attached(Self::KIND, &self.client, &self.id)?;
        client.knowledge_bases().list_documents(&id, topic_id)
    }
}

impl Entity for KnowledgeBase {
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

impl EntityKind for KnowledgeBase {
    const KIND: &'static str = "knowledge base";
}

impl Materialize for KnowledgeBase {
    const WIRE_NAME: &'static str = "knowledge base";
}

impl Attach for KnowledgeBase {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
        for topic in &mut self.topics {
            topic.attach(client);
        }
    }
}

impl<'a> From<&'a KnowledgeBase> for EntityRef<'a> {
    fn from(kb: &'a KnowledgeBase) -> Self {
        EntityRef::Object(kb)
    }
}

impl TaskBacked for KnowledgeBase {
    fn progress(&self) -> Option<&TaskProgress> {
        self.progress.as_ref()
    }

    fn refresh(&mut self) -> Result<()> {
        let (client, id) = require_attached(Self::KIND, &self.client, &self.id)?;
        *self = client.knowledge_bases().retrieve(&id)?;
        Ok(())
    }
}
