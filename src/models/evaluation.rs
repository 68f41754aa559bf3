use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::client::HubClient;
use crate::error::Result;
use crate::models::conversation::Conversation;
use crate::models::dataset::Dataset;
use crate::models::entity::{
    require_attached, Attach, Entity, EntityKind, EntityRef, Materialize,
};
use crate::models::model::{Model, ModelOutput};
use crate::models::task::{TaskBacked, TaskProgress, TaskStatus};
use crate::models::test_case::ChatTestCase;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Aggregated result of one evaluator over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    #[serde(default)]
    pub passed: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub errored: u64,
    #[serde(default)]
    pub total: u64,
}

impl Metric {
    /// Samples that were not evaluated at all.
    pub fn skipped(&self) -> u64 {
        self.total
            .saturating_sub(self.passed + self.failed + self.errored)
    }

    /// Percentage of passed evaluations over the executed samples. `NaN` when
    /// nothing was executed.
    pub fn percentage(&self) -> f64 {
        let executed = self.total - self.skipped();
        if executed == 0 {
            return f64::NAN;
        }
        self.passed as f64 / executed as f64 * 100.0
    }
}

/// One dataset/tags selection inside an evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCriteria {
    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Evaluation run
// ---------------------------------------------------------------------------

/// Evaluation run: a task-backed entity created by launching an evaluation.
///
/// `metrics` and `failure_categories` are filled in asynchronously by the
/// server; refresh at least once before trusting them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationRun {
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
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub model: Option<Model>,
    #[serde(default)]
    pub criteria: Vec<EvaluationCriteria>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub failure_categories: Map<String, Value>,
    /// Task progress, carried under the `status` wire key.
    #[serde(default, rename = "status")]
    pub progress: Option<TaskProgress>,
}

impl Entity for EvaluationRun {
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

impl EntityKind for EvaluationRun {
    const KIND: &'static str = "evaluation run";
}

impl Materialize for EvaluationRun {
    const WIRE_NAME: &'static str = "evaluation run";
}

impl Attach for EvaluationRun {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
        for dataset in &mut self.datasets {
            dataset.attach(client);
        }
        if let Some(model) = &mut self.model {
            model.attach(client);
        }
    }
}

impl<'a> From<&'a EvaluationRun> for EntityRef<'a> {
    fn from(run: &'a EvaluationRun) -> Self {
        EntityRef::Object(run)
    }
}

impl TaskBacked for EvaluationRun {
    fn progress(&self) -> Option<&TaskProgress> {
        self.progress.as_ref()
    }

    fn refresh(&mut self) -> Result<()> {
        let (client, id) = require_attached(Self::KIND, &self.client, &self.id)?;
        *self = client.evaluations().retrieve(&id)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Evaluation entries
// ---------------------------------------------------------------------------

/// The conversation under evaluation. Payloads admit two shapes sharing the
/// same role: the current `chat_test_case` and the deprecated `conversation`.
/// Materialization prefers `chat_test_case` when both keys are present.
#[derive(Debug, Clone)]
pub enum ChatScenario {
    TestCase(ChatTestCase),
    Conversation(Conversation),
}

impl ChatScenario {
    pub fn messages(&self) -> &[crate::models::chat::ChatMessage] {
        match self {
            ChatScenario::TestCase(tc) => &tc.messages,
            ChatScenario::Conversation(c) => &c.messages,
        }
    }
}

impl Serialize for ChatScenario {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            ChatScenario::TestCase(tc) => map.serialize_entry("chat_test_case", tc)?,
            ChatScenario::Conversation(c) => map.serialize_entry("conversation", c)?,
        }
        map.end()
    }
}

/// Per-check verdict on one evaluation entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorResult {
    pub name: String,
    #[serde(default = "running_status")]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn running_status() -> TaskStatus {
    TaskStatus::Running
}

/// One row of an evaluation run: the scenario, the model's answer and the
/// evaluator verdicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawEvaluationEntry")]
pub struct EvaluationEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) client: Option<HubClient>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(flatten)]
    pub scenario: ChatScenario,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_output: Option<ModelOutput>,
    pub results: Vec<EvaluatorResult>,
    pub status: TaskStatus,
}

#[derive(Deserialize)]
struct RawEvaluationEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "evaluation_id")]
    run_id: Option<String>,
    #[serde(default)]
    chat_test_case: Option<ChatTestCase>,
    #[serde(default)]
    conversation: Option<Conversation>,
    #[serde(default, alias = "output")]
    model_output: Option<ModelOutput>,
    #[serde(default)]
    results: Vec<EvaluatorResult>,
    #[serde(default = "running_status")]
    status: TaskStatus,
}

impl TryFrom<RawEvaluationEntry> for EvaluationEntry {
    type Error = String;

    fn try_from(raw: RawEvaluationEntry) -> std::result::Result<Self, Self::Error> {
        let scenario = match (raw.chat_test_case, raw.conversation) {
            (Some(test_case), _) => ChatScenario::TestCase(test_case),
            (None, Some(conversation)) => ChatScenario::Conversation(conversation),
            (None, None) => {
                return Err("expected a `chat_test_case` or `conversation` key".to_string())
            }
        };
        Ok(EvaluationEntry {
            id: raw.id,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            client: None,
            run_id: raw.run_id,
            scenario,
            model_output: raw.model_output,
            results: raw.results,
            status: raw.status,
        })
    }
}

impl Entity for EvaluationEntry {
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

impl EntityKind for EvaluationEntry {
    const KIND: &'static str = "evaluation entry";
}

impl Materialize for EvaluationEntry {
    const WIRE_NAME: &'static str = "evaluation entry";
}

impl Attach for EvaluationEntry {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
        match &mut self.scenario {
            ChatScenario::TestCase(tc) => tc.attach(client),
            ChatScenario::Conversation(c) => c.attach(client),
        }
    }
}

// ---------------------------------------------------------------------------
// Scheduled evaluation runs
// ---------------------------------------------------------------------------

/// Evaluation run launched by a scheduled evaluation. Same lifecycle as
/// [`EvaluationRun`], with a link back to its schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledEvaluationRun {
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
    pub scheduled_evaluation_id: Option<String>,
    #[serde(default)]
    pub model: Option<Model>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub failure_categories: Map<String, Value>,
    #[serde(default)]
    pub local: bool,
    #[serde(default, rename = "status")]
    pub progress: Option<TaskProgress>,
}

impl Entity for ScheduledEvaluationRun {
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

impl EntityKind for ScheduledEvaluationRun {
    const KIND: &'static str = "scheduled evaluation run";
}

impl Materialize for ScheduledEvaluationRun {
    const WIRE_NAME: &'static str = "scheduled evaluation run";
}

impl Attach for ScheduledEvaluationRun {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
        if let Some(model) = &mut self.model {
            model.attach(client);
        }
    }
}

impl<'a> From<&'a ScheduledEvaluationRun> for EntityRef<'a> {
    fn from(run: &'a ScheduledEvaluationRun) -> Self {
        EntityRef::Object(run)
    }
}

impl TaskBacked for ScheduledEvaluationRun {
    fn progress(&self) -> Option<&TaskProgress> {
        self.progress.as_ref()
    }

    fn refresh(&mut self) -> Result<()> {
        let (client, id) = require_attached(Self::KIND, &self.client, &self.id)?;
        *self = client.evaluations().retrieve_scheduled(&id)?;
        Ok(())
    }
}
