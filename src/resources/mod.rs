//! Resource façades: one thin client per entity collection.
//!
//! Each resource borrows the [`HubClient`](crate::HubClient), translates
//! typed arguments into JSON bodies and query parameters, and hands responses
//! to the materializer. No logic beyond request shaping lives here.

pub mod chat_test_cases;
pub mod checks;
pub mod conversations;
pub mod datasets;
pub mod evaluations;
pub mod knowledge_bases;
pub mod models;
pub mod probes;
pub mod projects;
pub mod scans;
pub mod scheduled_evaluations;

pub use chat_test_cases::{ChatTestCaseBody, ChatTestCaseUpdate, ChatTestCasesResource};
pub use checks::ChecksResource;
pub use conversations::{ConversationBody, ConversationUpdate, ConversationsResource};
pub use datasets::{
    DatasetUpdate, DatasetsResource, GenerateAdversarialParams, GenerateDocumentBasedParams,
};
pub use evaluations::{
    CreateEvaluationParams, EvaluationEntryUpdate, EvaluationsResource,
};
pub use knowledge_bases::{
    CreateKnowledgeBaseParams, KnowledgeBaseUpdate, KnowledgeBasesResource,
};
pub use models::{CreateModelParams, ModelUpdate, ModelsResource};
pub use probes::ProbesResource;
pub use projects::{ProjectUpdate, ProjectsResource};
pub use scans::{CreateScanParams, ScansResource};
pub use scheduled_evaluations::{
    CreateScheduledEvaluationParams, ScheduledEvaluationUpdate, ScheduledEvaluationsResource,
};
