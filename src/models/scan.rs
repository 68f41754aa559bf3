use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::HubClient;
use crate::error::Result;
use crate::models::chat::ChatMessage;
use crate::models::entity::{
    require_attached, Attach, Entity, EntityKind, EntityRef, Materialize,
};
use crate::models::evaluation::Metric;
use crate::models::model::Model;
use crate::models::task::{TaskBacked, TaskProgress};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Overall scan grade. Absent on the wire until the scan finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanGrade {
    A,
    B,
    C,
    D,
    #[default]
    #[serde(rename = "N/A")]
    NotAvailable,
}

/// Severity of a vulnerability, as an integer scale on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    #[default]
    Safe,
    Minor,
    Major,
    Critical,
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Severity::Safe),
            1 => Ok(Severity::Minor),
            2 => Ok(Severity::Major),
            3 => Ok(Severity::Critical),
            other => Err(format!("invalid severity value: {other}")),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity as u8
    }
}

/// Human review state of a probe attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Ignored,
    Acknowledged,
    Corrected,
}

// ---------------------------------------------------------------------------
// Probe results
// ---------------------------------------------------------------------------

/// Error raised by a probe during the scan, as summarized by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeErrorSummary {
    pub probe_lidar_id: String,
    #[serde(default)]
    pub original_error: String,
    #[serde(default)]
    pub trace: String,
}

/// One attempt made by a probe against the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeAttempt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) client: Option<HubClient>,

    #[serde(default)]
    pub probe_result_id: Option<String>,
    #[serde(default)]
    pub successful: bool,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub attempt_metadata: Map<String, Value>,
    #[serde(default)]
    pub review_status: ReviewStatus,
}

impl ProbeAttempt {
    pub fn reviewed(&self) -> bool {
        self.review_status != ReviewStatus::Pending
    }
}

impl Entity for ProbeAttempt {
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

impl EntityKind for ProbeAttempt {
    const KIND: &'static str = "probe attempt";
}

impl Materialize for ProbeAttempt {
    const WIRE_NAME: &'static str = "probe attempt";
}

impl Attach for ProbeAttempt {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
    }
}

/// Aggregated result of one probe over all its attempts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) client: Option<HubClient>,

    #[serde(default)]
    pub scan_result_id: Option<String>,
    #[serde(default)]
    pub probe_lidar_id: Option<String>,
    #[serde(default)]
    pub probe_name: Option<String>,
    #[serde(default)]
    pub probe_description: Option<String>,
    #[serde(default)]
    pub probe_tags: Vec<String>,
    #[serde(default)]
    pub probe_category: Option<String>,
    #[serde(default)]
    pub vulnerable: bool,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default, rename = "status")]
    pub progress: Option<TaskProgress>,
    #[serde(default)]
    pub attempts: Vec<ProbeAttempt>,
}

impl Entity for ProbeResult {
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

impl EntityKind for ProbeResult {
    const KIND: &'static str = "probe result";
}

impl Materialize for ProbeResult {
    const WIRE_NAME: &'static str = "probe result";
}

impl Attach for ProbeResult {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
        for attempt in &mut self.attempts {
            attempt.attach(client);
        }
    }
}

impl<'a> From<&'a ProbeResult> for EntityRef<'a> {
    fn from(result: &'a ProbeResult) -> Self {
        EntityRef::Object(result)
    }
}

// ---------------------------------------------------------------------------
// Scan result
// ---------------------------------------------------------------------------

/// Security scan over a model: a task-backed entity. `grade` and `results`
/// are filled in by the server as probes complete; refresh before trusting
/// them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
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
    pub model: Option<Model>,
    #[serde(default)]
    pub knowledge_base_id: Option<String>,
    #[serde(default)]
    pub grade: ScanGrade,
    #[serde(default)]
    pub errors: Vec<ProbeErrorSummary>,
    #[serde(default)]
    pub tags_filter: Vec<String>,
    #[serde(default)]
    pub scan_metadata: Map<String, Value>,
    #[serde(default)]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(default, rename = "status")]
    pub progress: Option<TaskProgress>,
    #[serde(default)]
    pub results: Vec<ProbeResult>,
}

impl Entity for ScanResult {
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

impl EntityKind for ScanResult {
    const KIND: &'static str = "scan result";
}

impl Materialize for ScanResult {
    const WIRE_NAME: &'static str = "scan result";
}

impl Attach for ScanResult {
    fn attach(&mut self, client: &HubClient) {
        self.client = Some(client.clone());
        if let Some(model) = &mut self.model {
            model.attach(client);
        }
        for result in &mut self.results {
            result.attach(client);
        }
    }
}

impl<'a> From<&'a ScanResult> for EntityRef<'a> {
    fn from(scan: &'a ScanResult) -> Self {
        EntityRef::Object(scan)
    }
}

impl TaskBacked for ScanResult {
    fn progress(&self) -> Option<&TaskProgress> {
        self.progress.as_ref()
    }

    fn refresh(&mut self) -> Result<()> {
        let (client, id) = require_attached(Self::KIND, &self.client, &self.id)?;
        *self = client.scans().retrieve(&id)?;
        Ok(())
    }
}
