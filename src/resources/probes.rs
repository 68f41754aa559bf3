use serde::Deserialize;

use crate::client::HubClient;
use crate::error::Result;
use crate::models::scan::{ProbeAttempt, ProbeResult};

const BASE_URL: &str = "/probes";

#[derive(Deserialize)]
struct ItemsWrapper {
    items: Vec<serde_json::Value>,
}

pub struct ProbesResource<'a> {
    client: &'a HubClient,
}

impl<'a> ProbesResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    pub fn retrieve(&self, probe_result_id: &str) -> Result<ProbeResult> {
        let path = format!("{BASE_URL}/{probe_result_id}");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        self.client.materialize(body)
    }

    /// All attempts recorded for a probe result.
    pub fn get_attempts(&self, probe_result_id: &str) -> Result<Vec<ProbeAttempt>> {
        let path = format!("{BASE_URL}/{probe_result_id}/attempts");
        let body = self.client.transport().get(&path, &[])?;
        let body = self.client.expect_body(&path, body)?;
        let wrapper: ItemsWrapper = serde_json::from_value(body)?;
        self.client
            .materialize_vec(serde_json::Value::Array(wrapper.items))
    }
}
