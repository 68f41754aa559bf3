use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::entity::Materialize;

/// Check configuration as exposed by the SDK: an identifier plus optional
/// parameters.
///
/// The backend stores checks in a different shape, with parameters folded
/// into an `assertions` list (see [`TestCaseCheckConfig`]). Deserialization
/// accepts both shapes and normalizes to this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCheckConfig")]
pub struct CheckConfig {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl CheckConfig {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            params: None,
            enabled: true,
        }
    }

    pub fn with_params(identifier: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            identifier: identifier.into(),
            params: Some(params),
            enabled: true,
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl Materialize for CheckConfig {
    const WIRE_NAME: &'static str = "check configuration";
}

#[derive(Deserialize)]
struct RawCheckConfig {
    identifier: String,
    #[serde(default)]
    params: Option<Map<String, Value>>,
    #[serde(default)]
    assertions: Option<Vec<Map<String, Value>>>,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

impl From<RawCheckConfig> for CheckConfig {
    fn from(raw: RawCheckConfig) -> Self {
        // Backend shape: parameters live in the first assertion, alongside a
        // `type` key repeating the identifier.
        let params = match raw.assertions.as_ref().and_then(|a| a.first()) {
            Some(assertion) => {
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
            None => raw.params,
        };

        CheckConfig {
            identifier: raw.identifier,
            params,
            enabled: raw.enabled,
        }
    }
}

/// Check configuration in the backend's wire shape, used when building create
/// and update payloads for test cases and conversations.
#[derive(Debug, Clone, Serialize)]
pub struct TestCaseCheckConfig {
    pub identifier: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertions: Option<Vec<Map<String, Value>>>,
}

/// Convert SDK-form checks to the backend wire shape.
pub fn checks_to_backend(checks: &[CheckConfig]) -> Vec<TestCaseCheckConfig> {
    checks
        .iter()
        .map(|check| {
            let assertions = check.params.as_ref().map(|params| {
                let mut assertion = Map::new();
                assertion.insert("type".to_string(), Value::String(check.identifier.clone()));
                for (k, v) in params {
                    assertion.insert(k.clone(), v.clone());
                }
                vec![assertion]
            });
            TestCaseCheckConfig {
                identifier: check.identifier.clone(),
                enabled: check.enabled,
                assertions,
            }
        })
        .collect()
}

/// A check definition available in a project, as returned by the checks
/// listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub identifier: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl Materialize for Check {
    const WIRE_NAME: &'static str = "check";
}
