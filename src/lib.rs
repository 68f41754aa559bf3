//! Client library for the Giskard Hub LLM evaluation platform.
//!
//! The Hub evaluates conversational agents: datasets of chat test cases are
//! run against registered models, security scans probe them for
//! vulnerabilities, and knowledge bases drive document-based test
//! generation. This crate exposes those capabilities through a blocking
//! client with typed entities.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use hub_client::{HubClient, TaskBacked};
//!
//! let client = HubClient::new("https://hub.example.com", "GSK_API_KEY").unwrap();
//!
//! let project = client.projects().create("My Agent", "QA agent rollout").unwrap();
//! let datasets = client.datasets().list(project.id.as_deref().unwrap()).unwrap();
//! let models = client.models().list(project.id.as_deref().unwrap()).unwrap();
//!
//! // Launch an evaluation and block until it settles.
//! let mut run = client
//!     .evaluate(&datasets[0], &models[0], None, Some("nightly".into()))
//!     .unwrap();
//! run.wait_for_completion(Duration::from_secs(600), Duration::from_secs(5))
//!     .unwrap();
//! ```
//!
//! Entities returned by the client keep a handle back to it, so instance
//! methods like [`Dataset::test_cases`](models::Dataset::test_cases) or
//! [`ScanResult`](models::ScanResult) polling work without threading the
//! client through manually. Entities built locally (e.g. deserialized from a
//! file) are detached and return
//! [`HubApiError::DetachedEntity`] from those methods.

pub mod client;
pub mod error;
pub mod maybe;
pub mod models;
pub mod resources;
pub mod transport;

// Re-export the main public types at the crate root for convenience.
pub use client::HubClient;
pub use error::{HubApiError, Result};
pub use maybe::Maybe;
pub use models::{
    Check, CheckConfig, ChatMessage, ChatMessageWithMetadata, ChatRole, ChatScenario,
    ChatTestCase, Conversation, Dataset, Document, EvaluationEntry, EvaluationRun,
    EvaluatorResult, ExecutionError, ExecutionStatus, FrequencyOption, KnowledgeBase, Metric,
    Model, ModelOutput, ProbeAttempt, ProbeErrorSummary, ProbeResult, Project, ReviewStatus,
    ScanGrade, ScanResult, ScheduledEvaluation, ScheduledEvaluationRun, Severity, TaskBacked,
    TaskProgress, TaskStatus, Topic,
};
pub use transport::{HttpTransport, Transport};
