use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::client::HubClient;
use crate::error::{HubApiError, Result};
use crate::maybe::Maybe;
use crate::models::knowledge_base::{Document, KnowledgeBase, Topic};

const BASE_URL: &str = "/knowledge-bases";

/// Parameters for creating a knowledge base from a JSONL file.
#[derive(Debug, Clone)]
pub struct CreateKnowledgeBaseParams {
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Column of the JSONL records holding the document text.
    pub document_column: Option<String>,
    /// Column of the JSONL records holding a pre-assigned topic.
    pub topic_column: Option<String>,
}

/// Partial update for a knowledge base; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KnowledgeBaseUpdate {
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub name: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub description: Maybe<String>,
    #[serde(skip_serializing_if = "Maybe::is_not_given")]
    pub project_id: Maybe<String>,
}

pub struct KnowledgeBasesResource<'a> {
    client: &'a HubClient,
}

impl<'a> KnowledgeBasesResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    pub fn retrieve(&self, knowledge_base_id: &str) -> Result<KnowledgeBase> {
        let path = format!("{BASE_URL}/{knowledge_base_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    /// Upload a JSONL file and create a knowledge base from it. Metadata
    /// travels as query parameters, the file as a multipart part named
    /// `kb_file`. Ingestion continues server-side; poll the returned entity.
    pub fn create(
        &self,
        params: &CreateKnowledgeBaseParams,
        file: impl AsRef<Path>,
    ) -> Result<KnowledgeBase> {
        let file = file.as_ref();
        let bytes = fs::read(file).map_err(|e| HubApiError::Connection {
            url: file.display().to_string(),
            message: format!("could not read knowledge base file: {e}"),
        })?;
        let filename = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "kb.jsonl".to_string());

        let mut query = vec![
            ("project_id".to_string(), params.project_id.clone()),
            ("name".to_string(), params.name.clone()),
        ];
        if let Some(description) = &params.description {
            query.push(("description".to_string(), description.clone()));
        }
        if let Some(column) = &params.document_column {
            query.push(("document_column".to_string(), column.clone()));
        }
        if let Some(column) = &params.topic_column {
            query.push(("topic_column".to_string(), column.clone()));
        }

        let body = self
            .client
            .transport()
            .post_file(BASE_URL, &query, "kb_file", &filename, bytes)?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize(body)
    }

    pub fn update(
        &self,
        knowledge_base_id: &str,
        update: &KnowledgeBaseUpdate,
    ) -> Result<KnowledgeBase> {
        let path = format!("{BASE_URL}/{knowledge_base_id}");
        let payload = serde_json::to_value(update)?;
        let body = self.client.transport().patch(&path, &payload)?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn delete(&self, knowledge_base_ids: &[&str]) -> Result<()> {
        let query: Vec<(String, String)> = knowledge_base_ids
            .iter()
            .map(|id| ("knowledge_base_ids".to_string(), id.to_string()))
            .collect();
        self.client.transport().delete(BASE_URL, &query)?;
        Ok(())
    }

    pub fn list(&self, project_id: &str) -> Result<Vec<KnowledgeBase>> {
        let query = vec![("project_id".to_string(), project_id.to_string())];
        let body = self.client.transport().get(BASE_URL, &query)?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize_vec(body)
    }

    pub fn list_topics(&self, knowledge_base_id: &str) -> Result<Vec<Topic>> {
        let path = format!("{BASE_URL}/{knowledge_base_id}/topics");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize_vec(body)
    }

    pub fn list_documents(
        &self,
        knowledge_base_id: &str,
        topic_id: Option<&str>,
    ) -> Result<Vec<Document>> {
        let path = format!("{BASE_URL}/{knowledge_base_id}/documents");
        let mut query = Vec::new();
        if let Some(topic_id) = topic_id {
            query.push(("topic_id".to_string(), topic_id.to_string()));
        }
        let body = self.client.transport().get(&path, &query)?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize_vec(body)
    }
}
