//! Partial-update payload shaping: the tri-state [`Maybe`] keeps unset
//! fields off the wire, sends explicit nulls, and refuses to serialize a
//! not-given value directly.

use std::collections::BTreeMap;

use serde_json::json;

use hub_client::resources::{
    ChatTestCaseUpdate, ModelUpdate, ProjectUpdate, ScheduledEvaluationUpdate,
};
use hub_client::{CheckConfig, HubApiError, Maybe};

#[test]
fn not_given_fields_are_absent_from_the_payload() {
    let update = ProjectUpdate {
        name: Maybe::Value("renamed".into()),
        ..Default::default()
    };
    let payload = serde_json::to_value(&update).unwrap();
    assert_eq!(payload, json!({"name": "renamed"}));
}

#[test]
fn explicit_null_reaches_the_wire() {
    let update = ProjectUpdate {
        description: Maybe::Null,
        ..Default::default()
    };
    let payload = serde_json::to_value(&update).unwrap();
    assert_eq!(payload, json!({"description": null}));
}

#[test]
fn empty_update_serializes_to_an_empty_object() {
    let payload = serde_json::to_value(ProjectUpdate::default()).unwrap();
    assert_eq!(payload, json!({}));
}

#[test]
fn from_option_maps_none_to_null() {
    let cleared: Maybe<String> = None.into();
    assert!(cleared.is_null());
    let set: Maybe<String> = Some("v".to_string()).into();
    assert_eq!(set.value().map(String::as_str), Some("v"));
    assert!(Maybe::<String>::default().is_not_given());
}

#[test]
fn serializing_a_not_given_value_directly_is_an_error() {
    let err = serde_json::to_value(Maybe::<String>::NotGiven).unwrap_err();
    let err: HubApiError = err.into();
    assert!(matches!(err, HubApiError::NotGivenLeak));
}

#[test]
fn model_update_serializes_headers_as_pairs() {
    let mut headers = BTreeMap::new();
    headers.insert("Authorization".to_string(), "Bearer x".to_string());
    let update = ModelUpdate {
        headers: Maybe::Value(headers),
        ..Default::default()
    };
    let payload = serde_json::to_value(&update).unwrap();
    assert_eq!(
        payload,
        json!({"headers": [{"name": "Authorization", "value": "Bearer x"}]})
    );
}

#[test]
fn test_case_update_converts_checks_to_the_backend_shape() {
    let mut params = serde_json::Map::new();
    params.insert("reference".to_string(), json!("Paris"));
    let update = ChatTestCaseUpdate {
        checks: Maybe::Value(vec![
            CheckConfig::with_params("correctness", params),
            CheckConfig::new("groundedness"),
        ]),
        ..Default::default()
    };
    let payload = serde_json::to_value(&update).unwrap();
    assert_eq!(
        payload["checks"][0],
        json!({
            "identifier": "correctness",
            "enabled": true,
            "assertions": [{"type": "correctness", "reference": "Paris"}],
        })
    );
    // No params, no assertions key.
    assert_eq!(
        payload["checks"][1],
        json!({"identifier": "groundedness", "enabled": true})
    );
}

#[test]
fn scheduled_evaluation_update_keeps_only_given_fields() {
    let update = ScheduledEvaluationUpdate {
        paused: Maybe::Value(true),
        day_of_week: Maybe::Null,
        ..Default::default()
    };
    let payload = serde_json::to_value(&update).unwrap();
    assert_eq!(payload, json!({"paused": true, "day_of_week": null}));
}
