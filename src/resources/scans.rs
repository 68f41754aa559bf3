use serde::Serialize;

use crate::client::HubClient;
use crate::error::Result;
use crate::models::scan::{ProbeResult, ScanResult};

const BASE_URL: &str = "/scans";

/// Parameters for launching a security scan against a model.
#[derive(Debug, Clone, Serialize)]
pub struct CreateScanParams {
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_base_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

pub struct ScansResource<'a> {
    client: &'a HubClient,
}

impl<'a> ScansResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    /// Create and start a scan. The scan runs asynchronously on the server;
    /// poll the returned result until it finishes.
    pub fn create(&self, params: &CreateScanParams) -> Result<ScanResult> {
        let payload = serde_json::to_value(params)?;
        let body = self
            .client
            .transport()
            .post(BASE_URL, Some(&payload), &[])?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize(body)
    }

    pub fn retrieve(&self, scan_id: &str) -> Result<ScanResult> {
        let path = format!("{BASE_URL}/{scan_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    pub fn list(&self, project_id: &str) -> Result<Vec<ScanResult>> {
        let query = vec![("project_id".to_string(), project_id.to_string())];
        let body = self.client.transport().get(BASE_URL, &query)?;
        let body = self.client.expect_body(BASE_URL, body)?;
        self.client.materialize_vec(body)
    }

    pub fn delete(&self, scan_ids: &[&str]) -> Result<()> {
        let query: Vec<(String, String)> = scan_ids
            .iter()
            .map(|id| ("scan_ids".to_string(), id.to_string()))
            .collect();
        self.client.transport().delete(BASE_URL, &query)?;
        Ok(())
    }

    /// Probe results attached to a scan.
    pub fn list_probes(&self, scan_id: &str) -> Result<Vec<ProbeResult>> {
        let path = format!("{BASE_URL}/{scan_id}/probes");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize_vec(body)
    }
}
