use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::HubClient;
use crate::error::Result;
use crate::models::entity::{
    require_attached, Attach, Entity, EntityKind, EntityRef, Materialize,
};

/// How often a scheduled evaluation runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyOption {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

/// Outcome of the last scheduled execution, tagged by its `status` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success { evaluation_id: String },
    Error { error_message: String },
}

/// Recurring evaluation of a model against a dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledEvaluation {
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
    pub model_id: Option<String>,
    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// How many times each test case is run (1-5).
    #[serde(default = "default_run_count")]
    pub run_count: u32,
    #[serde(default)]
    pub frequency: FrequencyOption,
    /// Execution time in `HH:MM` format.
    #[serde(default = "default_time")]
    pub time: String,
    /// 1-7, 1 is Monday. Only meaningful for weekly frequency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    /// 1-28. Only meaningful for monthly frequency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_execution_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_execution_status: Option<ExecutionStatus>,
    #[serde(default)]
    pub paused: bool,
}

fn default_run_count() -> u32 {
    1
}

fn default_time() -> String {
    "00:00".to_string()
}

impl ScheduledEvaluation {
    /// Refresh this scheduled evaluation from the Hub, overwriting every
    /// field in place.
    pub fn refresh(&mut self) -> Result<()> {
        let (client, id) = require_attached(Self::KIND, &self.client, &self.id)?;
        *self = client.scheduled_evaluations().retrieve(&id)?;
        Ok(())
    }
}

impl Entity for ScheduledEvaluation {
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

impl EntityKind for ScheduledEvaluation {
    const KIND: &'static str = "scheduled evaluation";
}

impl Materialize for ScheduledEvaluation {
    const WIRE_NAME: &'static str = "scheduled evaluation";
}

impl Attach for ScheduledEvaluation {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
    }
}

impl<'a> From<&'a ScheduledEvaluation> for EntityRef<'a> {
    fn from(scheduled: &'a ScheduledEvaluation) -> Self {
        EntityRef::Object(scheduled)
    }
}
