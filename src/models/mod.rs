//! Typed data model for the Hub API.
//!
//! Every entity materializes from raw wire JSON through [`Materialize`] and
//! carries a back-reference to the owning [`HubClient`](crate::HubClient) so
//! it can perform follow-up calls (`refresh`, nested-resource creation). The
//! back-reference is never serialized and is used only for calls, not for
//! lifetime management.

pub mod chat;
pub mod check;
pub mod conversation;
pub mod dataset;
pub mod entity;
pub mod evaluation;
pub mod knowledge_base;
pub mod model;
pub mod project;
pub mod scan;
pub mod schedule;
pub mod task;
pub mod test_case;

pub use chat::{ChatMessage, ChatMessageWithMetadata, ChatRole};
pub use check::{Check, CheckConfig, TestCaseCheckConfig};
pub use conversation::Conversation;
pub use dataset::Dataset;
pub use entity::{entity_to_id, Attach, Entity, EntityKind, EntityRef, Materialize};
pub use evaluation::{
    ChatScenario, EvaluationCriteria, EvaluationEntry, EvaluationRun, EvaluatorResult, Metric,
    ScheduledEvaluationRun,
};
pub use knowledge_base::{Document, KnowledgeBase, Topic};
pub use model::{ExecutionError, Model, ModelOutput};
pub use project::Project;
pub use scan::{
    ProbeAttempt, ProbeErrorSummary, ProbeResult, ReviewStatus, ScanGrade, ScanResult, Severity,
};
pub use schedule::{ExecutionStatus, FrequencyOption, ScheduledEvaluation};
pub use task::{TaskBacked, TaskProgress, TaskStatus};
pub use test_case::ChatTestCase;
