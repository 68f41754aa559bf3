use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::HubClient;
use crate::models::entity::{Attach, Entity, EntityKind, EntityRef, Materialize};

/// Project: top-level container grouping datasets, models and evaluations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
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
}

impl Entity for Project {
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

impl EntityKind for Project {
    const KIND: &'static str = "project";
}

impl Materialize for Project {
    const WIRE_NAME: &'static str = "project";
}

impl Attach for Project {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
    }
}

impl<'a> From<&'a Project> for EntityRef<'a> {
    fn from(project: &'a Project) -> Self {
        EntityRef::Object(project)
    }
}
