//! Request shaping: paths, query parameters, body layout and response
//! envelopes for each resource.

mod common;

use std::io::Write;

use serde_json::json;

use hub_client::resources::{
    ChatTestCaseBody, CreateKnowledgeBaseParams, CreateModelParams,
    CreateScheduledEvaluationParams, EvaluationEntryUpdate, ModelUpdate,
};
use hub_client::{
    ChatMessage, CheckConfig, FrequencyOption, HubApiError, Maybe, ModelOutput,
};

// ---------------------------------------------------------------------------
// Evaluations
// ---------------------------------------------------------------------------

#[test]
fn evaluate_builds_the_criteria_body() {
    let (client, transport) = common::client();
    transport.push_json(json!({"id": "run-1", "status": {"state": "running"}}));

    client
        .evaluate(
            "ds-1",
            "model-1",
            Some(vec!["smoke".into()]),
            Some("nightly".into()),
        )
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].path, "/evaluations");
    assert_eq!(
        calls[0].body.as_ref().unwrap(),
        &json!({
            "model_id": "model-1",
            "run_count": 1,
            "name": "nightly",
            "criteria": [{"dataset_id": "ds-1", "tags": ["smoke"]}],
        })
    );
}

#[test]
fn evaluate_without_optionals_omits_them() {
    let (client, transport) = common::client();
    transport.push_json(json!({"id": "run-1"}));

    client.evaluate("ds-1", "model-1", None, None).unwrap();

    let body = transport.calls()[0].body.clone().unwrap();
    assert!(body.get("name").is_none());
    assert_eq!(body["criteria"], json!([{"dataset_id": "ds-1"}]));
}

#[test]
fn entries_come_out_of_the_items_envelope() {
    let (client, transport) = common::client();
    transport.push_json(json!({
        "items": [
            {
                "id": "entry-1",
                "chat_test_case": {"messages": [{"role": "user", "content": "q"}]},
                "status": "finished",
            },
        ],
    }));

    let entries = client.evaluations().list_entries("run-1").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id.as_deref(), Some("entry-1"));

    let call = &transport.calls()[0];
    assert_eq!(call.path, "/evaluations/run-1/results");
    assert_eq!(call.query, vec![("limit".to_string(), "100000".to_string())]);
}

#[test]
fn entry_update_submits_the_output_under_response() {
    let (client, transport) = common::client();
    transport.push_json(json!({
        "id": "entry-1",
        "chat_test_case": {"messages": []},
        "status": "finished",
    }));

    let update = EvaluationEntryUpdate {
        model_output: Maybe::Value(ModelOutput::from_text("local answer")),
        ..Default::default()
    };
    client
        .evaluations()
        .update_entry("run-1", "entry-1", &update)
        .unwrap();

    let call = &transport.calls()[0];
    assert_eq!(call.method, "PATCH");
    assert_eq!(call.path, "/evaluations/run-1/results/entry-1/submit-local");
    assert_eq!(
        call.body.as_ref().unwrap(),
        &json!({
            "output": {
                "response": {"role": "assistant", "content": "local answer"},
                "metadata": {},
            },
        })
    );
}

// ---------------------------------------------------------------------------
// Datasets & test cases: the v2 data envelope
// ---------------------------------------------------------------------------

#[test]
fn dataset_responses_unwrap_the_data_envelope() {
    let (client, transport) = common::client();
    transport.push_json(json!({"data": [{"id": "ds-1", "name": "golden"}]}));

    let datasets = client.datasets().list("proj-1").unwrap();
    assert_eq!(datasets.len(), 1);
    assert_eq!(datasets[0].name.as_deref(), Some("golden"));
    assert_eq!(transport.calls()[0].path, "/v2/datasets");
}

#[test]
fn test_case_create_sends_backend_form_checks() {
    let (client, transport) = common::client();
    transport.push_json(json!({"data": {"id": "tc-1", "messages": []}}));

    let mut params = serde_json::Map::new();
    params.insert("reference".to_string(), json!("42"));
    let body = ChatTestCaseBody {
        messages: vec![ChatMessage::user("what is the answer?")],
        checks: vec![CheckConfig::with_params("correctness", params)],
        ..Default::default()
    };
    client.chat_test_cases().create("ds-1", body).unwrap();

    let sent = transport.calls()[0].body.clone().unwrap();
    assert_eq!(sent["dataset_id"], json!("ds-1"));
    assert_eq!(
        sent["checks"][0]["assertions"],
        json!([{"type": "correctness", "reference": "42"}])
    );
}

#[test]
fn bulk_delete_repeats_the_id_parameter() {
    let (client, transport) = common::client();
    transport.push_empty();

    client.projects().delete(&["p-1", "p-2"]).unwrap();

    let call = &transport.calls()[0];
    assert_eq!(call.method, "DELETE");
    assert_eq!(call.path, "/projects");
    assert_eq!(
        call.query,
        vec![
            ("project_ids".to_string(), "p-1".to_string()),
            ("project_ids".to_string(), "p-2".to_string()),
        ]
    );
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[test]
fn model_create_and_chat_round_trip() {
    let (client, transport) = common::client();
    transport.push_json(json!({"id": "model-1", "name": "agent", "project_id": "proj-1"}));
    transport.push_json(json!({
        "response": {"role": "assistant", "content": "hello"},
        "metadata": {"latency_ms": 12},
    }));

    let params = CreateModelParams {
        name: "agent".into(),
        url: "https://agent.example.com".into(),
        project_id: "proj-1".into(),
        description: String::new(),
        supported_languages: vec!["en".into()],
        headers: Default::default(),
    };
    let model = client.models().create(&params).unwrap();
    let output = model.chat(&[ChatMessage::user("hi")]).unwrap();

    assert_eq!(output.message.unwrap().content, "hello");
    let calls = transport.calls();
    assert_eq!(calls[1].path, "/models/model-1/chat");
    assert_eq!(
        calls[1].body.as_ref().unwrap()["messages"],
        json!([{"role": "user", "content": "hi"}])
    );
}

#[test]
fn model_update_patches_only_given_fields() {
    let (client, transport) = common::client();
    transport.push_json(json!({"id": "model-1"}));

    let update = ModelUpdate {
        url: Maybe::Value("https://new.example.com".into()),
        ..Default::default()
    };
    client.models().update("model-1", &update).unwrap();

    let call = &transport.calls()[0];
    assert_eq!(call.method, "PATCH");
    assert_eq!(call.path, "/models/model-1");
    assert_eq!(
        call.body.as_ref().unwrap(),
        &json!({"url": "https://new.example.com"})
    );
}

// ---------------------------------------------------------------------------
// Scans & probes
// ---------------------------------------------------------------------------

#[test]
fn probe_attempts_come_out_of_the_items_envelope() {
    let (client, transport) = common::client();
    transport.push_json(json!({
        "items": [{"id": "att-1", "successful": true, "severity": 1}],
    }));

    let attempts = client.probes().get_attempts("probe-1").unwrap();
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].successful);
    assert_eq!(transport.calls()[0].path, "/probes/probe-1/attempts");
}

#[test]
fn scan_probes_listing_hits_the_nested_path() {
    let (client, transport) = common::client();
    transport.push_json(json!([{"id": "probe-1", "vulnerable": false}]));

    let probes = client.scans().list_probes("scan-1").unwrap();
    assert_eq!(probes.len(), 1);
    assert_eq!(transport.calls()[0].path, "/scans/scan-1/probes");
}

// ---------------------------------------------------------------------------
// Knowledge bases
// ---------------------------------------------------------------------------

#[test]
fn knowledge_base_create_uploads_the_file_with_query_metadata() {
    let (client, transport) = common::client();
    transport.push_json(json!({"id": "kb-1", "name": "docs"}));

    let mut path = std::env::temp_dir();
    path.push("hub_client_kb_test.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{{\"text\": \"hello\"}}").unwrap();

    let params = CreateKnowledgeBaseParams {
        project_id: "proj-1".into(),
        name: "docs".into(),
        description: None,
        document_column: Some("text".into()),
        topic_column: None,
    };
    let kb = client.knowledge_bases().create(&params, &path).unwrap();
    assert_eq!(kb.id.as_deref(), Some("kb-1"));

    let call = &transport.calls()[0];
    assert_eq!(call.method, "POST_FILE");
    assert_eq!(call.path, "/knowledge-bases");
    assert!(call
        .query
        .contains(&("project_id".to_string(), "proj-1".to_string())));
    assert!(call
        .query
        .contains(&("document_column".to_string(), "text".to_string())));
    assert_eq!(
        call.body.as_ref().unwrap()["file"],
        json!("hub_client_kb_test.jsonl")
    );

    std::fs::remove_file(&path).ok();
}

#[test]
fn knowledge_base_create_with_a_missing_file_is_a_local_error() {
    let (client, transport) = common::client();
    let params = CreateKnowledgeBaseParams {
        project_id: "proj-1".into(),
        name: "docs".into(),
        description: None,
        document_column: None,
        topic_column: None,
    };
    let err = client
        .knowledge_bases()
        .create(&params, "/nonexistent/kb.jsonl")
        .unwrap_err();
    assert!(matches!(err, HubApiError::Connection { .. }));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn documents_listing_filters_by_topic() {
    let (client, transport) = common::client();
    transport.push_json(json!([{"id": "doc-1", "content": "hello", "topic_id": "top-1"}]));

    let docs = client
        .knowledge_bases()
        .list_documents("kb-1", Some("top-1"))
        .unwrap();
    assert_eq!(docs[0].content, "hello");

    let call = &transport.calls()[0];
    assert_eq!(call.path, "/knowledge-bases/kb-1/documents");
    assert_eq!(call.query, vec![("topic_id".to_string(), "top-1".to_string())]);
}

// ---------------------------------------------------------------------------
// Scheduled evaluations & checks
// ---------------------------------------------------------------------------

#[test]
fn scheduled_evaluation_create_sends_the_schedule_fields() {
    let (client, transport) = common::client();
    transport.push_json(json!({"id": "sched-1", "frequency": "weekly"}));

    let params = CreateScheduledEvaluationParams {
        project_id: "proj-1".into(),
        name: "weekly regression".into(),
        model_id: "model-1".into(),
        dataset_id: "ds-1".into(),
        frequency: FrequencyOption::Weekly,
        time: "02:30".into(),
        tags: None,
        run_count: 2,
        day_of_week: Some(1),
        day_of_month: None,
    };
    client.scheduled_evaluations().create(&params).unwrap();

    let body = transport.calls()[0].body.clone().unwrap();
    assert_eq!(body["frequency"], json!("weekly"));
    assert_eq!(body["day_of_week"], json!(1));
    assert!(body.get("day_of_month").is_none());
    assert_eq!(body["run_count"], json!(2));
}

#[test]
fn checks_listing_extracts_params_from_assertions() {
    let (client, transport) = common::client();
    transport.push_json(json!([
        {
            "identifier": "correctness",
            "name": "Correctness",
            "assertions": [{"type": "correctness", "reference": "42"}],
        },
        {"identifier": "custom_metadata"},
    ]));

    let checks = client.checks().list("proj-1").unwrap();
    assert_eq!(checks.len(), 2);
    assert_eq!(checks[0].params.as_ref().unwrap()["reference"], json!("42"));
    assert!(checks[1].params.is_none());

    let call = &transport.calls()[0];
    assert_eq!(call.path, "/checks");
    assert_eq!(
        call.query,
        vec![
            ("project_id".to_string(), "proj-1".to_string()),
            ("filter_builtin".to_string(), "true".to_string()),
        ]
    );
}

#[test]
fn an_empty_body_on_a_required_response_is_a_missing_response_error() {
    let (client, transport) = common::client();
    transport.push_empty();

    let err = client.projects().retrieve("p-1").unwrap_err();
    match err {
        HubApiError::MissingResponse { path } => assert_eq!(path, "/projects/p-1"),
        other => panic!("expected MissingResponse, got {other:?}"),
    }
}
