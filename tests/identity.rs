//! Entity identity resolution and the detached-entity guard.

mod common;

use serde_json::json;

use hub_client::models::{entity_to_id, Materialize};
use hub_client::{Dataset, HubApiError, Model};

#[test]
fn a_plain_id_passes_through() {
    let id = entity_to_id::<Dataset>("ds-123").unwrap();
    assert_eq!(id, "ds-123");
}

#[test]
fn a_saved_entity_resolves_to_its_id() {
    let dataset = Dataset::from_value(json!({"id": "ds-123", "name": "golden"})).unwrap();
    let id = entity_to_id::<Dataset>(&dataset).unwrap();
    assert_eq!(id, "ds-123");
}

#[test]
fn the_wrong_entity_kind_is_a_type_mismatch() {
    let model = Model::from_value(json!({"id": "model-1"})).unwrap();
    let err = entity_to_id::<Dataset>(&model).unwrap_err();
    match err {
        HubApiError::TypeMismatch { expected, actual } => {
            assert_eq!(expected, "dataset");
            assert_eq!(actual, "model");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn an_unsaved_entity_cannot_be_resolved() {
    let dataset = Dataset::default();
    let err = entity_to_id::<Dataset>(&dataset).unwrap_err();
    assert!(matches!(
        err,
        HubApiError::DetachedEntity { kind: "dataset", id: None }
    ));
}

#[test]
fn detached_entities_fail_before_any_network_call() {
    let dataset = Dataset::from_value(json!({"id": "ds-123"})).unwrap();
    // Materialized directly, not through a client: no back-reference.
    let err = dataset.test_cases().unwrap_err();
    match err {
        HubApiError::DetachedEntity { kind, id } => {
            assert_eq!(kind, "dataset");
            assert_eq!(id.as_deref(), Some("ds-123"));
        }
        other => panic!("expected DetachedEntity, got {other:?}"),
    }
}

#[test]
fn client_materialized_entities_are_attached() {
    let (client, transport) = common::client();
    transport.push_json(json!({"data": {"id": "ds-123", "name": "golden"}}));
    transport.push_json(json!({"data": []}));

    let dataset = client.datasets().retrieve("ds-123").unwrap();
    let test_cases = dataset.test_cases().unwrap();
    assert!(test_cases.is_empty());

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].path, "/v2/datasets/ds-123/test-cases");
    assert!(calls[1].query.is_empty());
}
