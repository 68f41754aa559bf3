use serde_json::{Map, Value};

use crate::client::HubClient;
use crate::error::Result;
use crate::models::check::Check;
use crate::models::entity::Materialize;

const BASE_URL: &str = "/checks";

pub struct ChecksResource<'a> {
    client: &'a HubClient,
}

impl<'a> ChecksResource<'a> {
    pub(crate) fn new(client: &'a HubClient) -> Self {
        Self { client }
    }

    /// Custom checks defined in a project. Built-in checks are filtered out
    /// server-side.
    pub fn list(&self, project_id: &str) -> Result<Vec<Check>> {
        let query = vec![
            ("project_id".to_string(), project_id.to_string()),
            ("filter_builtin".to_string(), "true".to_string()),
        ];
        let body = self.client.transport().get(BASE_URL, &query)?;
        let body = self.client.expect_body(BASE_URL, body)?;

        let items: Vec<Map<String, Value>> = serde_json::from_value(body)?;
        items
            .into_iter()
            .map(|mut item| {
                if let Some(params) = extract_params(&item) {
                    item.insert("params".to_string(), Value::Object(params));
                }
                Check::from_value(Value::Object(item))
            })
            .collect()
    }
}

/// Listing payloads carry check parameters in the assertions form; pull them
/// out into a flat map, dropping the `type` discriminator.
fn extract_params(check: &Map<String, Value>) -> Option<Map<String, Value>> {
    let assertion = check
        .get("assertions")?
        .as_array()?
        .first()?
        .as_object()?;
    let params: Map<String, Value> = assertion
        .iter()
        .filter(|(k, _)| k.as_str() != "type")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if params.is_empty() {
        None
    } else {
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_come_out_of_the_first_assertion() {
        let check = json!({
            "identifier": "correctness",
            "assertions": [{"type": "correctness", "reference": "The answer is 42."}],
        });
        let params = extract_params(check.as_object().unwrap()).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params["reference"], json!("The answer is 42."));
    }

    #[test]
    fn type_only_assertion_yields_no_params() {
        let check = json!({
            "identifier": "groundedness",
            "assertions": [{"type": "groundedness"}],
        });
        assert!(extract_params(check.as_object().unwrap()).is_none());
    }

    #[test]
    fn missing_assertions_yield_no_params() {
        let check = json!({"identifier": "custom"});
        assert!(extract_params(check.as_object().unwrap()).is_none());
    }
}
