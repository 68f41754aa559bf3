use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{HubApiError, Result};
use crate::models::dataset::Dataset;
use crate::models::entity::{entity_to_id, Attach, EntityRef, Materialize};
use crate::models::evaluation::EvaluationRun;
use crate::models::model::Model;
use crate::resources::chat_test_cases::ChatTestCasesResource;
use crate::resources::checks::ChecksResource;
use crate::resources::conversations::ConversationsResource;
use crate::resources::datasets::DatasetsResource;
use crate::resources::evaluations::{CreateEvaluationParams, EvaluationsResource};
use crate::resources::knowledge_bases::KnowledgeBasesResource;
use crate::resources::models::ModelsResource;
use crate::resources::probes::ProbesResource;
use crate::resources::projects::ProjectsResource;
use crate::resources::scans::ScansResource;
use crate::resources::scheduled_evaluations::ScheduledEvaluationsResource;
use crate::transport::{HttpTransport, Transport};

struct ClientInner {
    transport: Box<dyn Transport>,
}

/// Main entry point for interacting with the Hub API.
///
/// The client is a cheap handle over a shared transport; cloning it clones
/// the handle, not the connection pool. Every entity materialized through a
/// resource keeps one of these handles as a back-reference so it can refresh
/// itself or create nested resources later.
///
/// ```no_run
/// use hub_client::HubClient;
///
/// let client = HubClient::new("https://hub.example.com", "my-api-key").unwrap();
/// for project in client.projects().list().unwrap() {
///     println!("{}", project.name.as_deref().unwrap_or("<unnamed>"));
/// }
/// ```
#[derive(Clone)]
pub struct HubClient {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for HubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HubClient")
    }
}

impl HubClient {
    /// Create a new client and verify the connection.
    ///
    /// * `hub_url` – base URL of the Hub instance; the `/_api` suffix is
    ///   appended automatically when missing.
    /// * `api_key` – API key, sent as the `X-API-Key` header.
    ///
    /// Verification fetches `/openapi.json` and checks that the response is
    /// an OpenAPI document; anything else fails with
    /// [`HubApiError::Connection`] so a misconfigured URL surfaces here
    /// rather than as a confusing 404 on the first real call.
    pub fn new(hub_url: &str, api_key: &str) -> Result<Self> {
        let mut url = hub_url.trim_end_matches('/').to_string();
        if !url.ends_with("/_api") {
            url.push_str("/_api");
        }

        let transport = HttpTransport::new(&url, api_key)?;

        let discovery = transport
            .get("/openapi.json", &[])
            .map_err(|e| HubApiError::Connection {
                url: url.clone(),
                message: e.to_string(),
            })?;
        match discovery {
            Some(doc) if doc.get("openapi").is_some() => {}
            _ => {
                return Err(HubApiError::Connection {
                    url,
                    message: "the response doesn't appear to include an OpenAPI specification"
                        .into(),
                })
            }
        }

        Ok(Self::from_transport(Box::new(transport)))
    }

    /// Create a client from the `GSK_HUB_URL` and `GSK_API_KEY` environment
    /// variables.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("GSK_HUB_URL").map_err(|_| HubApiError::Connection {
            url: String::new(),
            message: "missing Hub URL: set the GSK_HUB_URL env variable".into(),
        })?;
        let key = std::env::var("GSK_API_KEY").map_err(|_| HubApiError::Connection {
            url: url.clone(),
            message: "missing API key: set the GSK_API_KEY env variable".into(),
        })?;
        Self::new(&url, &key)
    }

    /// Create a client over a custom transport, skipping the discovery
    /// check. This is the seam for tests and non-HTTP transports.
    pub fn from_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner { transport }),
        }
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    // ---- materialization helpers ------------------------------------------

    /// Turn a raw JSON object into a typed, client-bound entity.
    pub(crate) fn materialize<T: Materialize + Attach>(&self, value: Value) -> Result<T> {
        let mut entity = T::from_value(value)?;
        entity.attach(self);
        Ok(entity)
    }

    /// Materialize each element of a JSON array.
    pub(crate) fn materialize_vec<T: Materialize + Attach>(
        &self,
        value: Value,
    ) -> Result<Vec<T>> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(HubApiError::Materialize {
                    kind: T::WIRE_NAME,
                    message: format!("expected a JSON array, got {other}"),
                })
            }
        };
        items.into_iter().map(|item| self.materialize(item)).collect()
    }

    /// Unwrap the body of a 2xx response that must not be empty.
    pub(crate) fn expect_body(&self, path: &str, body: Option<Value>) -> Result<Value> {
        body.ok_or_else(|| HubApiError::MissingResponse {
            path: path.to_string(),
        })
    }

    // ---- resource accessors -----------------------------------------------

    pub fn projects(&self) -> ProjectsResource<'_> {
        ProjectsResource::new(self)
    }

    pub fn datasets(&self) -> DatasetsResource<'_> {
        DatasetsResource::new(self)
    }

    pub fn chat_test_cases(&self) -> ChatTestCasesResource<'_> {
        ChatTestCasesResource::new(self)
    }

    pub fn conversations(&self) -> ConversationsResource<'_> {
        ConversationsResource::new(self)
    }

    pub fn models(&self) -> ModelsResource<'_> {
        ModelsResource::new(self)
    }

    pub fn evaluations(&self) -> EvaluationsResource<'_> {
        EvaluationsResource::new(self)
    }

    pub fn scans(&self) -> ScansResource<'_> {
        ScansResource::new(self)
    }

    pub fn probes(&self) -> ProbesResource<'_> {
        ProbesResource::new(self)
    }

    pub fn knowledge_bases(&self) -> KnowledgeBasesResource<'_> {
        KnowledgeBasesResource::new(self)
    }

    pub fn scheduled_evaluations(&self) -> ScheduledEvaluationsResource<'_> {
        ScheduledEvaluationsResource::new(self)
    }

    pub fn checks(&self) -> ChecksResource<'_> {
        ChecksResource::new(self)
    }

    // ---- convenience ------------------------------------------------------

    /// Evaluate a model on a dataset. Both arguments accept either an id or
    /// the entity itself.
    pub fn evaluate<'a>(
        &self,
        dataset: impl Into<EntityRef<'a>>,
        model: impl Into<EntityRef<'a>>,
        tags: Option<Vec<String>>,
        name: Option<String>,
    ) -> Result<EvaluationRun> {
        let dataset_id = entity_to_id::<Dataset>(dataset)?;
        let model_id = entity_to_id::<Model>(model)?;
        self.evaluations().create(CreateEvaluationParams {
            model_id,
            dataset_id,
            tags,
            name,
            run_count: 1,
        })
    }
}
